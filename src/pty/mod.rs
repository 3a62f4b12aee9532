//! Pseudoterminal (PTY) Execution
//!
//! This module runs shell commands on a pseudoterminal with full terminal
//! emulation: process-group signalling, raw/cooked mode switching of the
//! caller's terminal and capture of the child's output.

pub mod executor;
pub mod pump;
pub mod signals;
pub mod terminal;
pub mod triggers;

// Re-exports for convenience
pub use executor::PtyExecutor;
pub use pump::{CaptureBuffer, IoPump, OutputCallback, PumpOptions, PumpReport};
pub use signals::InterruptHandle;
pub use terminal::TerminalGuard;
pub use triggers::{RawModeTriggers, DEFAULT_TRIGGERS};
