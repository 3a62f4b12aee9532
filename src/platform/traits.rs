//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Signals the executor sends to a child's process group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSignal {
    /// Interrupt signal (Ctrl+C)
    Interrupt,
    /// Termination signal (graceful shutdown)
    Terminate,
    /// Kill signal (forceful termination)
    Kill,
}

impl GroupSignal {
    /// Conventional signal name
    pub fn name(self) -> &'static str {
        match self {
            GroupSignal::Interrupt => "SIGINT",
            GroupSignal::Terminate => "SIGTERM",
            GroupSignal::Kill => "SIGKILL",
        }
    }
}

/// Platform-specific signal operations
///
/// Implementations must be callable from any thread; they only issue a
/// system call and never touch executor state.
pub trait SignalOps: Send + Sync {
    /// Deliver `signal` to every process in group `pgid`
    fn signal_group(&self, pgid: i32, signal: GroupSignal) -> Result<()>;

    /// Look up the process group of `pid`
    fn process_group_of(&self, pid: u32) -> Result<i32>;

    /// Check whether any process in group `pgid` still exists
    fn is_group_alive(&self, pgid: i32) -> bool;
}

/// Platform-specific filesystem operations
pub trait FilesystemOps: Send + Sync {
    /// Check if a file is executable
    fn is_executable(&self, path: &Path) -> bool;

    /// List executable file names in a directory
    fn list_executables(&self, dir: &Path) -> Vec<String>;

    /// Find a command in PATH
    fn find_command(&self, command: &str) -> Result<Option<PathBuf>>;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get configuration directory
    fn config_dir(&self) -> Result<PathBuf>;

    /// Get the user's home directory
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Platform-specific shell operations
pub trait ShellOps: Send + Sync {
    /// Get default shell path
    fn default_shell(&self) -> PathBuf;

    /// Ask `shell` for the names of its interactive aliases
    fn list_aliases(&self, shell: &Path, timeout: Duration) -> Vec<String>;
}
