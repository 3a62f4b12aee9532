//! ifw - an interactive infrastructure assistant CLI
//!
//! This library provides the interactive shell subsystem of ifw: a
//! classifier that tells shell commands apart from natural language, and a
//! persistent PTY-backed executor that runs commands with full terminal
//! emulation while keeping the working directory and environment across
//! invocations.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`classifier`] - Shell command vs natural language heuristic, command index
//! - [`session`] - Working directory, environment map and history of a session
//! - [`builtins`] - In-process `cd`, `pwd`, `export` and `unset`
//! - [`pty`] - PTY executor, I/O pump, raw-mode triggers, interrupts
//! - [`shell`] - [`InteractiveShell`] facade used by the command router
//! - [`models`] - Execution phases and outcomes, conversation messages
//!
//! ### Supporting Modules
//!
//! - [`config`] - Configuration tree and file loading
//! - [`platform`] - POSIX process-group, filesystem and shell operations
//! - [`ansi`] - Escape sequence removal for captured output
//! - [`cli`] - REPL controller and handler routing
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use ifw::{Config, InteractiveShell};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut shell = InteractiveShell::new(&Config::default())?;
//! if shell.is_shell_command("ls -la") {
//!     println!("{}", shell.execute_shell_command("ls -la"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Each command runs on two threads: the caller blocks on the child's exit
//! while one pump worker relays bytes between the caller's terminal and the
//! PTY master. The pump hands its capture back only after it has stopped,
//! so the buffer needs no lock. Interrupts are delivered as `SIGINT` to the
//! child's process group through a cloneable [`pty::InterruptHandle`].
//!
//! ## Platform Support
//!
//! - ✅ Linux
//! - ✅ macOS
//! - ❌ Windows (POSIX PTY semantics are required)

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod builtins;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod platform;
pub mod pty;
pub mod session;
pub mod shell;

// Re-exports for core functionality
pub use classifier::{CommandIndex, ShellCommandClassifier};
pub use config::Config;
pub use error::{Error, Result};
pub use session::SessionState;
pub use shell::InteractiveShell;

// Convenience re-exports for common types
pub use config::loader::ConfigLoader;
pub use models::{ExecutionOutcome, ExecutionPhase};
pub use pty::{InterruptHandle, PtyExecutor};

// Version information
/// The current version of ifw from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Environment variable that turns on debug logging
pub const DEBUG_ENV_VAR: &str = "IFW_DEBUG";

/// Pick the log filter: `RUST_LOG`, then the debug switch, then config
pub fn log_filter(debug: bool, config: &Config) -> String {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        if !filter.is_empty() {
            return filter;
        }
    }

    let debug_env = std::env::var(DEBUG_ENV_VAR)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if debug || debug_env {
        return "debug".to_string();
    }

    config.logging.level.clone()
}

/// Load configuration from `path`, or discover it, falling back to defaults
pub fn load_config(path: Option<&std::path::Path>) -> Config {
    let loaded = match path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load(),
    };

    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    }
}
