//! Platform abstraction layer
//!
//! This module provides a unified interface for the POSIX operations the
//! shell subsystem relies on: command lookup, config directories, shell
//! discovery and process-group signalling.

mod traits;
#[cfg(unix)]
mod unix;

pub use traits::*;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific signal operations
    pub fn signals() -> Box<dyn SignalOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixSignals::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform: POSIX PTY semantics are required");
        }
    }

    /// Get the platform-specific filesystem operations
    pub fn filesystem() -> Box<dyn FilesystemOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixFilesystem::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform: POSIX PTY semantics are required");
        }
    }

    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPaths::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform: POSIX PTY semantics are required");
        }
    }

    /// Get the platform-specific shell operations
    pub fn shell() -> Box<dyn ShellOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixShell::new())
        }

        #[cfg(not(unix))]
        {
            compile_error!("Unsupported platform: POSIX PTY semantics are required");
        }
    }
}
