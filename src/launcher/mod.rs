//! Launcher implementations.
//!
//! A launcher opens a URL in one of the two configured applications:
//! - `CommandLauncher`: spawns a local program per application

use crate::error::Result;
use crate::types::AppId;

mod command;

pub use command::{AppCommand, CommandLauncher};

/// Launch interface used by the router.
pub trait Launcher: Send + Sync {
    /// Identifier of the application configured for `app`, used in messages.
    fn identifier(&self, app: AppId) -> &str;

    /// Open `url` in the application configured for `app`.
    ///
    /// Returns `AppNotFound` if the application is not installed or cannot
    /// be resolved.
    fn launch(&self, url: &str, app: AppId) -> Result<()>;
}
