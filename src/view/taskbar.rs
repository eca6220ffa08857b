// Taskbar buttons and the start menu. Both only read the window list and
// hand back commands; neither keeps a copy of any window instance.

use serde::{Deserialize, Serialize};

use crate::state::events::WindowCommand;
use crate::state::window::WindowId;
use crate::state::WindowManager;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskbarButton {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    /// The topmost visible window
    pub highlighted: bool,
    pub minimized: bool,
}

/// One button per live window, in the order the windows were opened
pub fn taskbar_buttons(manager: &WindowManager) -> Vec<TaskbarButton> {
    let topmost = topmost(manager);
    manager
        .list_for_taskbar()
        .into_iter()
        .map(|w| TaskbarButton {
            id: w.id,
            title: w.title.clone(),
            icon: w.icon.clone(),
            highlighted: Some(w.id) == topmost,
            minimized: w.is_minimized,
        })
        .collect()
}

/// Topmost among non-minimized windows. A minimized window is never topmost,
/// whatever its z-index.
pub fn topmost(manager: &WindowManager) -> Option<WindowId> {
    manager.topmost().map(|w| w.id)
}

/// Clicking the topmost window's button hides it; any other button restores
/// and raises its window in one step.
pub fn taskbar_click(manager: &WindowManager, id: WindowId) -> WindowCommand {
    if topmost(manager) == Some(id) {
        WindowCommand::Minimize { id }
    } else {
        WindowCommand::Open { id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartSection {
    Pinned,
    SystemApps,
    Recommended,
    SearchResults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartEntry {
    pub id: WindowId,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub section: StartSection,
}

const PINNED: [(WindowId, &str); 6] = [
    (WindowId::About, "About Me"),
    (WindowId::Skills, "Skills"),
    (WindowId::Projects, "Projects"),
    (WindowId::Experience, "Experience"),
    (WindowId::Contact, "Contact"),
    (WindowId::Cv, "CV / Letter"),
];

const SYSTEM_APPS: [(WindowId, &str); 3] = [
    (WindowId::Paint, "Paint"),
    (WindowId::Explorer, "File Explorer"),
    (WindowId::Photos, "Photos"),
];

const RECOMMENDED: [(WindowId, &str, &str); 2] = [
    (WindowId::Projects, "My Projects", "Recently opened"),
    (WindowId::Cv, "My Resume", "Updated today"),
];

/// The power button in the start menu footer opens the contact window
pub const POWER_TARGET: WindowId = WindowId::Contact;

/// Start menu visibility and search. Independent of any window state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMenu {
    open: bool,
    query: String,
}

impl StartMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    /// Entries to show: the default sections, or search results while a
    /// query is typed. Empty while the menu is closed.
    pub fn entries(&self) -> Vec<StartEntry> {
        if !self.open {
            return Vec::new();
        }

        let catalog = PINNED
            .iter()
            .map(|(id, title)| (*id, *title, StartSection::Pinned))
            .chain(
                SYSTEM_APPS
                    .iter()
                    .map(|(id, title)| (*id, *title, StartSection::SystemApps)),
            );

        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            return catalog
                .filter(|(_, title, _)| title.to_lowercase().contains(&needle))
                .map(|(id, title, _)| StartEntry {
                    id,
                    title,
                    subtitle: None,
                    section: StartSection::SearchResults,
                })
                .collect();
        }

        catalog
            .map(|(id, title, section)| StartEntry {
                id,
                title,
                subtitle: None,
                section,
            })
            .chain(RECOMMENDED.iter().map(|(id, title, subtitle)| StartEntry {
                id: *id,
                title: *title,
                subtitle: Some(*subtitle),
                section: StartSection::Recommended,
            }))
            .collect()
    }

    /// Pick an app: the menu closes and the window opens.
    pub fn select(&mut self, id: WindowId) -> WindowCommand {
        self.close();
        WindowCommand::Open { id }
    }
}
