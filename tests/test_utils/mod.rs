//! Test Utilities
//!
//! Hermetic builders for shells and classifiers: `/bin/sh` as the child
//! shell, a fixed command index and no PATH scan, alias loading or probes.

#![allow(dead_code)]

pub mod fixtures;

// Re-exports for convenience
pub use fixtures::{hermetic_shell, test_classifier, test_config, test_session, KNOWN_COMMANDS};
