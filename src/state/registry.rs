// Default metadata for every window the shell can open

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::window::{Point, Size, WindowId};
use crate::error::{Result, ShellError};

/// Immutable defaults copied into a window instance when it is first opened.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WindowDefinition {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub position: Point,
    pub size: Size,
}

impl WindowDefinition {
    pub fn new(id: WindowId, title: &str, icon: &str, position: (f64, f64), size: (f64, f64)) -> Self {
        Self {
            id,
            title: title.to_string(),
            icon: icon.to_string(),
            position: Point::new(position.0, position.1),
            size: Size::new(size.0, size.1),
        }
    }
}

/// Lookup table from window id to its definition. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct WindowRegistry {
    definitions: HashMap<WindowId, WindowDefinition>,
}

impl WindowRegistry {
    /// The catalog shipped with the shell, one entry per `WindowId`.
    pub fn builtin() -> Self {
        let definitions = [
            WindowDefinition::new(WindowId::About, "About Me", "👤", (100.0, 50.0), (600.0, 450.0)),
            WindowDefinition::new(WindowId::Skills, "Skills", "⚡", (150.0, 80.0), (650.0, 500.0)),
            WindowDefinition::new(WindowId::Projects, "Projects", "📁", (200.0, 60.0), (750.0, 550.0)),
            WindowDefinition::new(WindowId::Experience, "Experience", "💼", (120.0, 90.0), (600.0, 480.0)),
            WindowDefinition::new(WindowId::Contact, "Contact", "📧", (180.0, 70.0), (500.0, 450.0)),
            WindowDefinition::new(WindowId::Cv, "CV / Attachment Letter", "📄", (140.0, 100.0), (550.0, 500.0)),
            WindowDefinition::new(WindowId::Paint, "Paint", "🎨", (160.0, 40.0), (700.0, 520.0)),
            WindowDefinition::new(WindowId::Explorer, "File Explorer", "🗂", (130.0, 60.0), (720.0, 500.0)),
            WindowDefinition::new(WindowId::Photos, "Photos", "🖼", (170.0, 80.0), (680.0, 500.0)),
        ];

        Self {
            definitions: definitions.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// Build a registry from configured definitions.
    /// Ids left out are simply unregistered; opening them fails.
    pub fn from_definitions(definitions: Vec<WindowDefinition>) -> Result<Self> {
        let mut map = HashMap::with_capacity(definitions.len());
        for def in definitions {
            let id = def.id;
            if map.insert(id, def).is_some() {
                return Err(ShellError::DuplicateDefinition(id));
            }
        }
        Ok(Self { definitions: map })
    }

    pub fn lookup(&self, id: WindowId) -> Result<&WindowDefinition> {
        self.definitions
            .get(&id)
            .ok_or(ShellError::UnregisteredWindow(id))
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_window_id() {
        let registry = WindowRegistry::builtin();
        assert_eq!(registry.len(), WindowId::ALL.len());
        for id in WindowId::ALL {
            assert_eq!(registry.lookup(id).unwrap().id, id);
        }
    }

    #[test]
    fn test_builtin_about_defaults() {
        let registry = WindowRegistry::builtin();
        let about = registry.lookup(WindowId::About).unwrap();
        assert_eq!(about.title, "About Me");
        assert_eq!(about.position, Point::new(100.0, 50.0));
        assert_eq!(about.size, Size::new(600.0, 450.0));
    }

    #[test]
    fn test_configured_registry_reports_missing_entries() {
        let registry = WindowRegistry::from_definitions(vec![WindowDefinition::new(
            WindowId::Paint,
            "Paint",
            "🎨",
            (0.0, 0.0),
            (320.0, 240.0),
        )])
        .unwrap();

        assert!(registry.contains(WindowId::Paint));
        assert!(matches!(
            registry.lookup(WindowId::About),
            Err(ShellError::UnregisteredWindow(WindowId::About))
        ));
    }

    #[test]
    fn test_duplicate_definitions_are_rejected() {
        let def = WindowDefinition::new(WindowId::Cv, "CV", "📄", (0.0, 0.0), (100.0, 100.0));
        let err = WindowRegistry::from_definitions(vec![def.clone(), def]).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateDefinition(WindowId::Cv)));
    }
}
