//! Shared fixtures

use ifw::classifier::{CommandIndex, ShellCommandClassifier};
use ifw::config::{ClassifierConfig, Config};
use ifw::{InteractiveShell, PtyExecutor, SessionState};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Commands the test index knows about
pub const KNOWN_COMMANDS: &[&str] = &[
    "ls", "git", "grep", "docker", "kubectl", "tar", "rm", "cp", "mv", "cat", "find", "ssh",
    "curl", "make", "sleep",
];

/// Configuration that never depends on the user's environment
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.shell.program = Some(PathBuf::from("/bin/sh"));
    config.classifier = ClassifierConfig {
        scan_path: false,
        load_aliases: false,
        runtime_probe: false,
        ..ClassifierConfig::default()
    };
    config
}

pub fn test_classifier() -> ShellCommandClassifier {
    let index = CommandIndex::from_names(KNOWN_COMMANDS.iter().copied());
    ShellCommandClassifier::with_index(Arc::new(index), test_config().classifier.stopword_ratio)
}

/// Session started in `dir`, with the process environment and HOME = `dir`
pub fn test_session(dir: &Path) -> SessionState {
    let mut env: std::collections::BTreeMap<String, String> = std::env::vars().collect();
    env.insert("HOME".to_string(), dir.to_string_lossy().into_owned());
    SessionState::with_startup(dir, env).expect("test session directory exists")
}

/// Full shell facade rooted at `dir`
pub fn hermetic_shell(dir: &Path) -> InteractiveShell {
    let config = test_config();
    let executor = PtyExecutor::new(config.pty.clone(), config.shell.resolve());
    InteractiveShell::with_parts(test_session(dir), test_classifier(), executor)
}
