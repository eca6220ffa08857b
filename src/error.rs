use thiserror::Error;

use crate::shell::ShellPhase;
use crate::state::window::WindowId;

/// Errors raised by the shell library.
///
/// Operations on windows that are simply not open are *not* errors; they are
/// silent no-ops. Everything here points at a configuration or wiring mistake.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A string did not name any supported window.
    #[error("unknown window id: {0:?}")]
    UnknownWindowId(String),

    /// The registry in use has no definition for this window.
    #[error("window '{0}' has no registry definition")]
    UnregisteredWindow(WindowId),

    /// The same window was defined twice while building a registry.
    #[error("window '{0}' is defined more than once")]
    DuplicateDefinition(WindowId),

    /// A boot/login/desktop transition was requested out of order.
    #[error("cannot move from {from:?} to {to:?}")]
    PhaseTransition { from: ShellPhase, to: ShellPhase },

    /// Window operations are only accepted once the desktop is showing.
    #[error("window operations are unavailable during {0:?}")]
    NotOnDesktop(ShellPhase),

    /// The z-index base leaves no room for windows to be raised.
    #[error("z-index base {0} exceeds the maximum of {max}", max = crate::config::MAX_Z_INDEX_BASE)]
    ZIndexBaseTooLarge(u64),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ShellError> = std::result::Result<T, E>;
