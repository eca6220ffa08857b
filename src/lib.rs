// Portfolio desktop shell: window manager core plus its rendering surfaces.

pub mod audio;
pub mod config;
pub mod error;
pub mod shell;
pub mod state;
pub mod tui;
pub mod view;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use commands::run;

pub use config::ShellConfig;
pub use error::{Result, ShellError};
pub use shell::{ShellController, ShellPhase};
pub use state::events::{WindowCommand, WindowEvent};
pub use state::window::{WindowId, WindowInstance};
pub use state::WindowManager;
