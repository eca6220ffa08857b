use tracing::{debug, error};

use self::events::{WindowCommand, WindowEvent};
use self::registry::WindowRegistry;
use self::window::{Point, WindowId, WindowInstance};
use crate::error::Result;

pub mod events;
pub mod registry;
pub mod window;

/// Z-index the running maximum starts from; the first window gets `base + 1`.
pub const DEFAULT_Z_INDEX_BASE: u64 = 100;

pub type Listener = Box<dyn FnMut(&WindowEvent) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns every live window and all lifecycle transitions.
///
/// Closed windows are removed outright, so "closed" means "absent". Every
/// per-window operation is a silent no-op when the window is not open.
pub struct WindowManager {
    registry: WindowRegistry,
    windows: Vec<WindowInstance>, // Open order, which is also taskbar order
    highest_z_index: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl WindowManager {
    pub fn new(registry: WindowRegistry) -> Self {
        Self::with_z_index_base(registry, DEFAULT_Z_INDEX_BASE)
    }

    pub fn with_z_index_base(registry: WindowRegistry, base: u64) -> Self {
        Self {
            registry,
            windows: Vec::new(),
            highest_z_index: base,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Open a window, or restore and raise it if it is already open.
    ///
    /// Fails only when the registry has no definition for `id`, which is a
    /// configuration mistake rather than a runtime race.
    pub fn open(&mut self, id: WindowId) -> Result<&WindowInstance> {
        let (index, event) = if let Some(index) = self.index_of(id) {
            let z_index = self.next_z_index();
            let win = &mut self.windows[index];
            win.is_minimized = false;
            win.z_index = z_index;
            debug!(%id, z_index, "window reactivated");
            (index, WindowEvent::Reactivated { id, z_index })
        } else {
            let def = self
                .registry
                .lookup(id)
                .inspect_err(|e| error!(%id, "cannot open window: {}", e))?
                .clone();
            let z_index = self.next_z_index();
            let window = WindowInstance {
                id,
                title: def.title,
                icon: def.icon,
                is_open: true,
                is_minimized: false,
                is_maximized: false,
                z_index,
                position: def.position,
                size: def.size,
            };
            debug!(%id, z_index, "window opened");
            self.windows.push(window.clone());
            (self.windows.len() - 1, WindowEvent::Opened(window))
        };

        self.notify(&event);
        Ok(&self.windows[index])
    }

    /// Remove a window from the live collection
    pub fn close(&mut self, id: WindowId) -> Option<WindowInstance> {
        let index = self.index_of(id)?;
        let removed = self.windows.remove(index);
        debug!(%id, "window closed");
        self.notify(&WindowEvent::Closed { id });
        Some(removed)
    }

    pub fn minimize(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        if win.is_minimized {
            return;
        }
        win.is_minimized = true;
        debug!(%id, "window minimized");
        self.notify(&WindowEvent::Minimized { id });
    }

    pub fn toggle_maximize(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        win.is_maximized = !win.is_maximized;
        let maximized = win.is_maximized;
        debug!(%id, maximized, "window maximize toggled");
        self.notify(&WindowEvent::MaximizeToggled { id, maximized });
    }

    /// Bring a window to the front. Does not restore a minimized window;
    /// use [`WindowManager::open`] for that.
    pub fn focus(&mut self, id: WindowId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let z_index = self.next_z_index();
        self.windows[index].z_index = z_index;
        debug!(%id, z_index, "window focused");
        self.notify(&WindowEvent::Focused { id, z_index });
    }

    /// Overwrite the stored position. Stored even while maximized so that
    /// restoring returns the window to where it was last dragged. No clamping.
    pub fn update_position(&mut self, id: WindowId, position: Point) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        win.position = position;
        self.notify(&WindowEvent::Moved { id, position });
    }

    /// Run a command produced by a view or the taskbar.
    pub fn apply(&mut self, command: WindowCommand) -> Result<()> {
        match command {
            WindowCommand::Open { id } => {
                self.open(id)?;
            }
            WindowCommand::Close { id } => {
                self.close(id);
            }
            WindowCommand::Minimize { id } => self.minimize(id),
            WindowCommand::ToggleMaximize { id } => self.toggle_maximize(id),
            WindowCommand::Focus { id } => self.focus(id),
            WindowCommand::Move { id, position } => self.update_position(id, position),
        }
        Ok(())
    }

    /// Non-minimized windows, in no particular order
    pub fn list_open(&self) -> Vec<&WindowInstance> {
        self.windows.iter().filter(|w| !w.is_minimized).collect()
    }

    /// Every live window, minimized or not, in open order
    pub fn list_for_taskbar(&self) -> Vec<&WindowInstance> {
        self.windows.iter().collect()
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn is_open(&self, id: WindowId) -> bool {
        self.index_of(id).is_some()
    }

    /// The non-minimized window with the greatest z-index
    pub fn topmost(&self) -> Option<&WindowInstance> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| w.z_index)
    }

    pub fn highest_z_index(&self) -> u64 {
        self.highest_z_index
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&WindowEvent) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn next_z_index(&mut self) -> u64 {
        self.highest_z_index += 1;
        self.highest_z_index
    }

    fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowInstance> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    fn notify(&mut self, event: &WindowEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WindowRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::registry::WindowDefinition;
    use super::*;
    use crate::error::ShellError;
    use std::sync::{Arc, Mutex};

    fn manager() -> WindowManager {
        WindowManager::default()
    }

    #[test]
    fn test_first_open_uses_registry_defaults() {
        let mut wm = manager();
        let win = wm.open(WindowId::About).unwrap().clone();

        assert_eq!(win.title, "About Me");
        assert_eq!(win.position, Point::new(100.0, 50.0));
        assert!(win.is_open);
        assert!(!win.is_minimized);
        assert!(!win.is_maximized);
        assert_eq!(win.z_index, DEFAULT_Z_INDEX_BASE + 1);
    }

    #[test]
    fn test_open_twice_keeps_one_instance() {
        let mut wm = manager();
        wm.open(WindowId::Skills).unwrap();
        wm.open(WindowId::Projects).unwrap();
        wm.open(WindowId::Skills).unwrap();

        let skills = wm
            .list_for_taskbar()
            .into_iter()
            .filter(|w| w.id == WindowId::Skills)
            .count();
        assert_eq!(skills, 1);
        assert_eq!(wm.list_for_taskbar().len(), 2);
    }

    #[test]
    fn test_open_reactivates_minimized_window_without_touching_geometry() {
        let mut wm = manager();
        wm.open(WindowId::Contact).unwrap();
        wm.toggle_maximize(WindowId::Contact);
        wm.update_position(WindowId::Contact, Point::new(33.0, 44.0));
        wm.minimize(WindowId::Contact);
        wm.open(WindowId::About).unwrap();

        let before = wm.get(WindowId::Contact).unwrap().clone();
        let highest = wm.highest_z_index();
        let after = wm.open(WindowId::Contact).unwrap().clone();

        assert!(!after.is_minimized);
        assert_eq!(after.z_index, highest + 1);
        assert_eq!(after.is_maximized, before.is_maximized);
        assert_eq!(after.position, before.position);
        assert_eq!(after.size, before.size);
    }

    #[test]
    fn test_focus_assigns_strictly_increasing_z_index() {
        let mut wm = manager();
        wm.open(WindowId::About).unwrap();
        wm.open(WindowId::Cv).unwrap();

        let mut last = wm.highest_z_index();
        for id in [WindowId::About, WindowId::About, WindowId::Cv] {
            wm.focus(id);
            let z = wm.get(id).unwrap().z_index;
            assert!(z > last);
            last = z;
        }
        assert_eq!(wm.topmost().unwrap().id, WindowId::Cv);
    }

    #[test]
    fn test_focus_does_not_restore_minimized_window() {
        let mut wm = manager();
        wm.open(WindowId::Paint).unwrap();
        wm.minimize(WindowId::Paint);
        wm.focus(WindowId::Paint);

        assert!(wm.get(WindowId::Paint).unwrap().is_minimized);
        assert!(wm.topmost().is_none());
    }

    #[test]
    fn test_minimize_hides_from_open_list_only() {
        let mut wm = manager();
        wm.open(WindowId::Experience).unwrap();
        wm.open(WindowId::Photos).unwrap();
        wm.minimize(WindowId::Experience);

        let open: Vec<_> = wm.list_open().iter().map(|w| w.id).collect();
        let taskbar: Vec<_> = wm.list_for_taskbar().iter().map(|w| w.id).collect();
        assert_eq!(open, vec![WindowId::Photos]);
        assert_eq!(taskbar, vec![WindowId::Experience, WindowId::Photos]);
    }

    #[test]
    fn test_close_removes_from_both_lists() {
        let mut wm = manager();
        wm.open(WindowId::Explorer).unwrap();
        let closed = wm.close(WindowId::Explorer).unwrap();

        assert_eq!(closed.id, WindowId::Explorer);
        assert!(wm.list_open().is_empty());
        assert!(wm.list_for_taskbar().is_empty());
        assert!(!wm.is_open(WindowId::Explorer));
    }

    #[test]
    fn test_operations_on_absent_window_are_no_ops() {
        let mut wm = manager();
        wm.open(WindowId::About).unwrap();
        let snapshot: Vec<_> = wm.list_for_taskbar().into_iter().cloned().collect();
        let highest = wm.highest_z_index();

        assert!(wm.close(WindowId::Skills).is_none());
        wm.minimize(WindowId::Skills);
        wm.toggle_maximize(WindowId::Skills);
        wm.focus(WindowId::Skills);
        wm.update_position(WindowId::Skills, Point::new(1.0, 1.0));

        let after: Vec<_> = wm.list_for_taskbar().into_iter().cloned().collect();
        assert_eq!(snapshot, after);
        assert_eq!(wm.highest_z_index(), highest);
    }

    #[test]
    fn test_minimized_and_maximized_are_independent() {
        let mut wm = manager();
        wm.open(WindowId::Projects).unwrap();
        wm.toggle_maximize(WindowId::Projects);
        wm.minimize(WindowId::Projects);

        let win = wm.get(WindowId::Projects).unwrap();
        assert!(win.is_minimized);
        assert!(win.is_maximized);

        wm.toggle_maximize(WindowId::Projects);
        assert!(!wm.get(WindowId::Projects).unwrap().is_maximized);
    }

    #[test]
    fn test_position_is_stored_while_maximized() {
        let mut wm = manager();
        wm.open(WindowId::About).unwrap();
        wm.toggle_maximize(WindowId::About);
        wm.update_position(WindowId::About, Point::new(-40.0, 9000.0));

        // No clamping here, that belongs to the view
        assert_eq!(wm.get(WindowId::About).unwrap().position, Point::new(-40.0, 9000.0));
    }

    #[test]
    fn test_open_unregistered_window_fails_loudly() {
        let registry = registry::WindowRegistry::from_definitions(vec![WindowDefinition::new(
            WindowId::About,
            "About Me",
            "👤",
            (0.0, 0.0),
            (100.0, 100.0),
        )])
        .unwrap();
        let mut wm = WindowManager::new(registry);

        let err = wm.open(WindowId::Paint).unwrap_err();
        assert!(matches!(err, ShellError::UnregisteredWindow(WindowId::Paint)));
        assert!(wm.list_for_taskbar().is_empty());
        assert_eq!(wm.highest_z_index(), DEFAULT_Z_INDEX_BASE);
    }

    #[test]
    fn test_subscribers_see_each_change_once() {
        let mut wm = manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = wm.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        wm.open(WindowId::Cv).unwrap();
        wm.minimize(WindowId::Cv);
        wm.minimize(WindowId::Cv); // already minimized, nothing to report
        wm.open(WindowId::Cv).unwrap();
        wm.close(WindowId::Skills); // absent
        wm.close(WindowId::Cv);

        let events = seen.lock().unwrap().clone();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], WindowEvent::Opened(ref w) if w.id == WindowId::Cv));
        assert_eq!(events[1], WindowEvent::Minimized { id: WindowId::Cv });
        assert_eq!(
            events[2],
            WindowEvent::Reactivated {
                id: WindowId::Cv,
                z_index: DEFAULT_Z_INDEX_BASE + 2,
            }
        );
        assert_eq!(events[3], WindowEvent::Closed { id: WindowId::Cv });

        assert!(wm.unsubscribe(sub));
        assert!(!wm.unsubscribe(sub));
        wm.open(WindowId::About).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_apply_routes_commands() {
        let mut wm = manager();
        wm.apply(WindowCommand::Open { id: WindowId::Skills }).unwrap();
        wm.apply(WindowCommand::Move {
            id: WindowId::Skills,
            position: Point::new(5.0, 6.0),
        })
        .unwrap();
        wm.apply(WindowCommand::ToggleMaximize { id: WindowId::Skills }).unwrap();

        let win = wm.get(WindowId::Skills).unwrap();
        assert_eq!(win.position, Point::new(5.0, 6.0));
        assert!(win.is_maximized);

        wm.apply(WindowCommand::Close { id: WindowId::Skills }).unwrap();
        assert!(!wm.is_open(WindowId::Skills));
    }
}
