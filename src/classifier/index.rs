//! Known command index
//!
//! Long-lived, append-only set of command names: PATH executables, shell
//! builtins, aliases and commands confirmed by a runtime probe. It is
//! populated lazily on first lookup and never shrinks.

use crate::config::ClassifierConfig;
use crate::platform::{FilesystemOps, Platform, ShellOps};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

/// Shell builtins and keywords that are always commands
pub const SHELL_BUILTINS: &[&str] = &[
    "cd", "pwd", "echo", "export", "source", "alias", "unalias", "history", "jobs", "fg", "bg",
    "kill", "wait", "exec", "eval", "test", "[", "printf", "read", "set", "unset", "shift",
    "exit", "return", "break", "continue", "which", "type", "command", "builtin", "declare",
    "local", "readonly", "true", "false",
];

/// Maximum number of completion suggestions returned
const MAX_SUGGESTIONS: usize = 10;

/// Cache of command names the classifier accepts as a first word
pub struct CommandIndex {
    known: RwLock<HashSet<String>>,
    loaded: OnceCell<()>,
    config: ClassifierConfig,
    shell: PathBuf,
    filesystem: Box<dyn FilesystemOps>,
    shell_ops: Box<dyn ShellOps>,
}

impl CommandIndex {
    /// Create an index that discovers commands from the environment on first use
    pub fn new(config: &ClassifierConfig, shell: PathBuf) -> Self {
        Self {
            known: RwLock::new(HashSet::new()),
            loaded: OnceCell::new(),
            config: config.clone(),
            shell,
            filesystem: Platform::filesystem(),
            shell_ops: Platform::shell(),
        }
    }

    /// Create a fixed index from explicit names, with no discovery or probing
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = ClassifierConfig {
            scan_path: false,
            load_aliases: false,
            runtime_probe: false,
            ..ClassifierConfig::default()
        };
        let index = Self::new(&config, PathBuf::from("/bin/sh"));
        index.extend(names);
        index
    }

    /// Whether `name` is a shell builtin
    pub fn is_builtin(name: &str) -> bool {
        SHELL_BUILTINS.contains(&name)
    }

    /// Whether `name` looks like a path to an executable rather than a bare word
    pub fn is_path_like(name: &str) -> bool {
        name.starts_with("./") || name.contains('/')
    }

    /// Whether `name` is present in the cache
    pub fn contains(&self, name: &str) -> bool {
        self.ensure_loaded();
        self.known
            .read()
            .map(|known| known.contains(name))
            .unwrap_or(false)
    }

    /// Decide whether `name` resolves to a runnable command
    ///
    /// Order: builtin, cached name, path-like token, then a runtime probe
    /// whose positive answer is cached.
    pub fn resolves(&self, name: &str) -> bool {
        if Self::is_builtin(name) || self.contains(name) || Self::is_path_like(name) {
            return true;
        }

        if !self.config.runtime_probe {
            return false;
        }

        match self.filesystem.find_command(name) {
            Ok(Some(path)) => {
                debug!("Probe found {} at {}", name, path.display());
                self.insert(name);
                true
            }
            Ok(None) => false,
            Err(e) => {
                debug!("Command probe for {} failed: {}", name, e);
                false
            }
        }
    }

    /// Add a confirmed command name
    pub fn insert(&self, name: &str) {
        if let Ok(mut known) = self.known.write() {
            known.insert(name.to_string());
        }
    }

    /// Add several names at once
    pub fn extend<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut known) = self.known.write() {
            known.extend(names.into_iter().map(Into::into));
        }
    }

    /// Known names starting with `prefix`, sorted, at most ten
    pub fn suggestions(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.ensure_loaded();

        let known = match self.known.read() {
            Ok(known) => known,
            Err(_) => return Vec::new(),
        };
        let mut matches: Vec<String> = known
            .iter()
            .map(String::as_str)
            .chain(SHELL_BUILTINS.iter().copied())
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        matches.sort();
        matches.dedup();
        matches.truncate(MAX_SUGGESTIONS);
        matches
    }

    /// Number of cached names (builtins excluded)
    pub fn len(&self) -> usize {
        self.ensure_loaded();
        self.known.read().map(|known| known.len()).unwrap_or(0)
    }

    /// Whether the cache holds no names
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_loaded(&self) {
        self.loaded.get_or_init(|| self.populate());
    }

    fn populate(&self) {
        let mut discovered = Vec::new();

        if self.config.scan_path {
            if let Some(path_env) = std::env::var_os("PATH") {
                for dir in std::env::split_paths(&path_env) {
                    discovered.extend(self.filesystem.list_executables(&dir));
                }
            }
        }

        if self.config.load_aliases {
            let timeout = Duration::from_millis(self.config.alias_timeout_ms);
            discovered.extend(self.shell_ops.list_aliases(Path::new(&self.shell), timeout));
        }

        debug!("Command index loaded {} names", discovered.len());
        self.extend(discovered);
    }
}
