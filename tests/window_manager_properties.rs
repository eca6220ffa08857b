use std::collections::HashSet;

use portfolio_os_lib::state::window::Point;
use portfolio_os_lib::view::taskbar;
use portfolio_os_lib::{WindowCommand, WindowId, WindowManager};
use proptest::prelude::*;

fn window_id() -> impl Strategy<Value = WindowId> {
    (0..WindowId::ALL.len()).prop_map(|i| WindowId::ALL[i])
}

fn command() -> impl Strategy<Value = WindowCommand> {
    prop_oneof![
        window_id().prop_map(|id| WindowCommand::Open { id }),
        window_id().prop_map(|id| WindowCommand::Close { id }),
        window_id().prop_map(|id| WindowCommand::Minimize { id }),
        window_id().prop_map(|id| WindowCommand::ToggleMaximize { id }),
        window_id().prop_map(|id| WindowCommand::Focus { id }),
        (window_id(), -500.0..2000.0f64, -500.0..2000.0f64).prop_map(|(id, x, y)| {
            WindowCommand::Move {
                id,
                position: Point::new(x, y),
            }
        }),
    ]
}

proptest! {
    #[test]
    fn test_ids_stay_unique(commands in prop::collection::vec(command(), 0..64)) {
        let mut wm = WindowManager::default();
        for command in commands {
            wm.apply(command).unwrap();
            let ids: Vec<_> = wm.list_for_taskbar().iter().map(|w| w.id).collect();
            let unique: HashSet<_> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len());
        }
    }

    #[test]
    fn test_raising_always_exceeds_previous_maximum(commands in prop::collection::vec(command(), 0..64)) {
        let mut wm = WindowManager::default();
        for command in commands {
            let before = wm.highest_z_index();
            wm.apply(command).unwrap();

            let raised = matches!(command, WindowCommand::Open { .. })
                || (matches!(command, WindowCommand::Focus { .. }) && wm.is_open(command.window_id()));
            if raised {
                let z = wm.get(command.window_id()).unwrap().z_index;
                prop_assert!(z > before);
                prop_assert_eq!(z, wm.highest_z_index());
            }
            prop_assert!(wm.highest_z_index() >= before);
        }
    }

    #[test]
    fn test_close_is_idempotent(commands in prop::collection::vec(command(), 0..32), id in window_id()) {
        let mut wm = WindowManager::default();
        for command in commands {
            wm.apply(command).unwrap();
        }
        wm.close(id);
        let snapshot: Vec<_> = wm.list_for_taskbar().into_iter().cloned().collect();
        prop_assert!(wm.close(id).is_none());
        let after: Vec<_> = wm.list_for_taskbar().into_iter().cloned().collect();
        prop_assert_eq!(snapshot, after);
    }

    #[test]
    fn test_minimized_windows_hidden_but_on_taskbar(commands in prop::collection::vec(command(), 0..64)) {
        let mut wm = WindowManager::default();
        for command in commands {
            wm.apply(command).unwrap();
        }
        for win in wm.list_for_taskbar() {
            let visible = wm.list_open().iter().any(|w| w.id == win.id);
            prop_assert_eq!(visible, !win.is_minimized);
        }
        let highest_visible = wm.list_open().iter().map(|w| w.z_index).max();
        match taskbar::topmost(&wm) {
            Some(top) => {
                let top = wm.get(top).unwrap();
                prop_assert!(!top.is_minimized);
                prop_assert_eq!(Some(top.z_index), highest_visible);
            }
            None => {
                prop_assert_eq!(highest_visible, None);
            }
        }
    }

    #[test]
    fn test_closed_window_is_gone_everywhere(commands in prop::collection::vec(command(), 0..32), id in window_id()) {
        let mut wm = WindowManager::default();
        for command in commands {
            wm.apply(command).unwrap();
        }
        wm.close(id);
        prop_assert!(!wm.is_open(id));
        prop_assert!(wm.list_open().iter().all(|w| w.id != id));
        prop_assert!(wm.list_for_taskbar().iter().all(|w| w.id != id));
    }
}
