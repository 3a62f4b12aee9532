//! Configuration management for ifw
//!
//! This module provides the serde configuration tree and the loader that
//! discovers configuration files on disk.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for ifw
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Child shell selection
    pub shell: ShellConfig,

    /// PTY executor tuning
    pub pty: PtyConfig,

    /// Command classifier behavior
    pub classifier: ClassifierConfig,

    /// Logging defaults
    pub logging: LoggingConfig,
}

/// Shell selection for spawned commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Explicit shell program; `$SHELL` is used when unset
    pub program: Option<PathBuf>,

    /// Shell used when neither `program` nor `$SHELL` is set
    pub fallback: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: None,
            fallback: PathBuf::from("/bin/bash"),
        }
    }
}

impl ShellConfig {
    /// Resolve the shell that runs `shell -c command`
    pub fn resolve(&self) -> PathBuf {
        if let Some(program) = &self.program {
            return program.clone();
        }
        std::env::var_os("SHELL")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// PTY-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PtyConfig {
    /// Rows used when the real terminal size is unavailable
    pub default_rows: u16,

    /// Columns used when the real terminal size is unavailable
    pub default_cols: u16,

    /// Read size for the PTY master
    pub read_buffer_size: usize,

    /// Read size for the caller's stdin
    pub stdin_buffer_size: usize,

    /// Bound on joining the I/O pump after the child exits
    pub join_timeout_ms: u64,

    /// How long the pump keeps draining the master after the stop signal
    pub drain_timeout_ms: u64,

    /// Wait between SIGTERM and SIGKILL during cleanup
    pub terminate_grace_ms: u64,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            default_rows: 24,
            default_cols: 80,
            read_buffer_size: 4096,
            stdin_buffer_size: 1024,
            join_timeout_ms: 500,
            drain_timeout_ms: 50,
            terminate_grace_ms: 100,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Scan PATH directories when the index is first used
    pub scan_path: bool,

    /// Ask the user's shell for its aliases at index load time
    pub load_aliases: bool,

    /// Upper bound on the alias listing subprocess
    pub alias_timeout_ms: u64,

    /// Fall back to a `which` probe for unknown command words
    pub runtime_probe: bool,

    /// Stop-word fraction above which a residue counts as prose
    pub stopword_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            scan_path: true,
            load_aliases: true,
            alias_timeout_ms: 3000,
            runtime_probe: true,
            stopword_ratio: 0.4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
