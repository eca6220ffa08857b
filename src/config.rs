//! Shell configuration, loaded from JSON.
//!
//! Every field has a default, so an empty object (or no file at all) gives the
//! stock desktop: a 1024x768 viewport, a 48px taskbar and the built-in windows.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, ShellError};
use crate::state::registry::{WindowDefinition, WindowRegistry};
use crate::state::window::Size;
use crate::state::DEFAULT_Z_INDEX_BASE;
use crate::view::{DragMargin, Viewport};

/// Largest accepted z-index base. Raising increments the running maximum,
/// so the base must leave headroom below `u64::MAX`.
pub const MAX_Z_INDEX_BASE: u64 = u32::MAX as u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    pub viewport: Size,
    pub taskbar_height: f64,
    pub drag_margin: DragMargin,
    pub z_index_base: u64,
    pub muted: bool,
    pub dark_mode: bool,
    /// Replaces the built-in window catalog when present
    pub windows: Option<Vec<WindowDefinition>>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(1024.0, 768.0),
            taskbar_height: 48.0,
            drag_margin: DragMargin::default(),
            z_index_base: DEFAULT_Z_INDEX_BASE,
            muted: false,
            dark_mode: false,
            windows: None,
        }
    }
}

impl ShellConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded shell config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.z_index_base > MAX_Z_INDEX_BASE {
            return Err(ShellError::ZIndexBaseTooLarge(self.z_index_base));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height, self.taskbar_height)
    }

    pub fn registry(&self) -> Result<WindowRegistry> {
        match &self.windows {
            Some(defs) => WindowRegistry::from_definitions(defs.clone()),
            None => Ok(WindowRegistry::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::window::WindowId;
    use std::io::Write;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = ShellConfig::from_json("{}").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.viewport().work_area().height, 720.0);
        assert_eq!(config.registry().unwrap().len(), WindowId::ALL.len());
    }

    #[test]
    fn test_partial_override() {
        let config = ShellConfig::from_json(
            r#"{ "viewport": { "width": 1920.0, "height": 1080.0 }, "muted": true, "dragMargin": { "minVisibleWidth": 150.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.viewport, Size::new(1920.0, 1080.0));
        assert!(config.muted);
        assert_eq!(config.drag_margin.min_visible_width, 150.0);
        assert_eq!(config.drag_margin.min_visible_height, 100.0);
        assert_eq!(config.taskbar_height, 48.0);
    }

    #[test]
    fn test_window_overrides_replace_the_catalog() {
        let config = ShellConfig::from_json(
            r#"{ "windows": [
                { "id": "about", "title": "Who am I", "icon": "?", "position": { "x": 0.0, "y": 0.0 }, "size": { "width": 300.0, "height": 200.0 } }
            ] }"#,
        )
        .unwrap();

        let registry = config.registry().unwrap();
        assert_eq!(registry.lookup(WindowId::About).unwrap().title, "Who am I");
        assert!(!registry.contains(WindowId::Skills));
    }

    #[test]
    fn test_unknown_window_in_config_is_rejected() {
        let err = ShellConfig::from_json(
            r#"{ "windows": [ { "id": "minesweeper", "title": "x", "icon": "x", "position": { "x": 0.0, "y": 0.0 }, "size": { "width": 1.0, "height": 1.0 } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
    }

    #[test]
    fn test_oversized_z_index_base_is_rejected() {
        let err = ShellConfig::from_json(r#"{ "zIndexBase": 18446744073709551615 }"#).unwrap_err();
        assert!(matches!(err, ShellError::ZIndexBaseTooLarge(u64::MAX)));

        let config = ShellConfig::from_json(&format!(r#"{{ "zIndexBase": {} }}"#, MAX_Z_INDEX_BASE)).unwrap();
        assert_eq!(config.z_index_base, MAX_Z_INDEX_BASE);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "zIndexBase": 7, "darkMode": true }}"#).unwrap();

        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.z_index_base, 7);
        assert!(config.dark_mode);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = ShellConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ShellError::Io(_)));
    }
}
