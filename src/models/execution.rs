//! Execution Model
//!
//! Lifecycle phases of one PTY invocation and the outcome it produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker returned when the user interrupted the command
pub const INTERRUPTED_MARKER: &str = "🛑 Command interrupted";

/// Phase of a single command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExecutionPhase {
    /// No command in flight
    #[default]
    Idle,
    /// PTY allocated, terminal saved, child being spawned
    Spawning,
    /// Child running, pump relaying I/O
    Running,
    /// Child exited, pump draining the master
    Draining,
    /// Releasing terminal, descriptors and the process group
    Cleanup,
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionPhase::Idle => "idle",
            ExecutionPhase::Spawning => "spawning",
            ExecutionPhase::Running => "running",
            ExecutionPhase::Draining => "draining",
            ExecutionPhase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Result of one PTY execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Captured output with escape sequences removed and whitespace trimmed
    pub output: String,

    /// Exit code of the shell; signals are reported as `128 + signo`
    pub exit_code: i32,

    /// The user interrupted this command
    pub interrupted: bool,
}

impl ExecutionOutcome {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.interrupted
    }

    /// Render the display/log text for the outcome
    pub fn render(&self) -> String {
        if self.interrupted {
            return INTERRUPTED_MARKER.to_string();
        }

        if self.exit_code == 0 {
            return self.output.clone();
        }

        let marker = format!("❌ Command exited with code {}", self.exit_code);
        if self.output.is_empty() {
            marker
        } else {
            format!("{}\n{}", self.output, marker)
        }
    }
}
