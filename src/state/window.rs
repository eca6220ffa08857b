use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShellError;

/// Every window the shell knows how to show.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WindowId {
    About,
    Skills,
    Projects,
    Experience,
    Contact,
    Cv,
    Paint,
    Explorer,
    Photos,
}

impl WindowId {
    pub const ALL: [WindowId; 9] = [
        WindowId::About,
        WindowId::Skills,
        WindowId::Projects,
        WindowId::Experience,
        WindowId::Contact,
        WindowId::Cv,
        WindowId::Paint,
        WindowId::Explorer,
        WindowId::Photos,
    ];

    /// Wire name, as used by the web front-end and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowId::About => "about",
            WindowId::Skills => "skills",
            WindowId::Projects => "projects",
            WindowId::Experience => "experience",
            WindowId::Contact => "contact",
            WindowId::Cv => "cv",
            WindowId::Paint => "paint",
            WindowId::Explorer => "explorer",
            WindowId::Photos => "photos",
        }
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowId {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ShellError::UnknownWindowId(s.to_string()))
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowInstance {
    pub id: WindowId,            // Also the instance key, one live instance per id
    pub title: String,           // Copied from the registry on open
    pub icon: String,
    pub is_open: bool,           // Always true while in the live collection
    pub is_minimized: bool,
    pub is_maximized: bool,      // Independent of is_minimized
    pub z_index: u64,            // Unique among live windows, higher draws on top
    pub position: Point,         // Ignored for layout while maximized
    pub size: Size,
}
