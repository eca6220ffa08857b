// Right-click menu on the desktop background

use serde::Serialize;

use crate::state::window::Point;
use crate::view::Viewport;

pub const MENU_WIDTH: f64 = 220.0;
pub const MENU_HEIGHT: f64 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextMenuItem {
    View,
    SortBy,
    Refresh,
    New,
    DisplaySettings,
    Personalize,
    AboutPortfolio,
}

impl ContextMenuItem {
    pub const ALL: [ContextMenuItem; 7] = [
        ContextMenuItem::View,
        ContextMenuItem::SortBy,
        ContextMenuItem::Refresh,
        ContextMenuItem::New,
        ContextMenuItem::DisplaySettings,
        ContextMenuItem::Personalize,
        ContextMenuItem::AboutPortfolio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContextMenuItem::View => "View",
            ContextMenuItem::SortBy => "Sort by",
            ContextMenuItem::Refresh => "Refresh",
            ContextMenuItem::New => "New",
            ContextMenuItem::DisplaySettings => "Display settings",
            ContextMenuItem::Personalize => "Personalize",
            ContextMenuItem::AboutPortfolio => "About this portfolio",
        }
    }

    /// Whether a divider is drawn above this item
    pub fn starts_group(&self) -> bool {
        matches!(
            self,
            ContextMenuItem::Refresh
                | ContextMenuItem::New
                | ContextMenuItem::DisplaySettings
                | ContextMenuItem::AboutPortfolio
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextMenu {
    pub origin: Point,
}

impl ContextMenu {
    /// Open at the pointer, pulled back so the menu fits on screen
    pub fn at(pointer: Point, viewport: &Viewport) -> Self {
        Self {
            origin: Point::new(
                pointer.x.min(viewport.width - MENU_WIDTH),
                pointer.y.min(viewport.height - MENU_HEIGHT),
            ),
        }
    }
}
