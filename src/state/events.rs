use serde::{Deserialize, Serialize};

use super::window::{Point, WindowId, WindowInstance};

/// Change notification emitted by the window manager after a state change.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WindowEvent {
    /// A new instance was created from the registry defaults
    Opened(WindowInstance),
    /// An existing instance was restored and brought to the front
    #[serde(rename_all = "camelCase")]
    Reactivated { id: WindowId, z_index: u64 },
    Closed { id: WindowId },
    Minimized { id: WindowId },
    MaximizeToggled { id: WindowId, maximized: bool },
    #[serde(rename_all = "camelCase")]
    Focused { id: WindowId, z_index: u64 },
    Moved { id: WindowId, position: Point },
}

impl WindowEvent {
    pub fn window_id(&self) -> WindowId {
        match self {
            WindowEvent::Opened(instance) => instance.id,
            WindowEvent::Reactivated { id, .. }
            | WindowEvent::Closed { id }
            | WindowEvent::Minimized { id }
            | WindowEvent::MaximizeToggled { id, .. }
            | WindowEvent::Focused { id, .. }
            | WindowEvent::Moved { id, .. } => *id,
        }
    }
}

/// A window-manager operation in value form, produced by views and the taskbar.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WindowCommand {
    Open { id: WindowId },
    Close { id: WindowId },
    Minimize { id: WindowId },
    ToggleMaximize { id: WindowId },
    Focus { id: WindowId },
    Move { id: WindowId, position: Point },
}

impl WindowCommand {
    pub fn window_id(&self) -> WindowId {
        match self {
            WindowCommand::Open { id }
            | WindowCommand::Close { id }
            | WindowCommand::Minimize { id }
            | WindowCommand::ToggleMaximize { id }
            | WindowCommand::Focus { id }
            | WindowCommand::Move { id, .. } => *id,
        }
    }
}
