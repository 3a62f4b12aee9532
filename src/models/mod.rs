//! Core data models for ifw
//!
//! Execution lifecycle types produced by the PTY executor and the
//! conversation log the CLI keeps of issued commands and their results.

pub mod execution;
pub mod message;

// Re-exports for convenience
pub use execution::{ExecutionOutcome, ExecutionPhase, INTERRUPTED_MARKER};
pub use message::{Conversation, Message, Role};
