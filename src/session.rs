//! Session State
//!
//! Working directory, environment map and command history owned by one
//! interactive session. The environment map is independent of the OS
//! process environment: builtins mutate it, and it is handed explicitly to
//! every spawned child.

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The directory and environment a session starts from, used by `reset`
#[derive(Debug, Clone)]
struct Startup {
    dir: PathBuf,
    env: BTreeMap<String, String>,
}

/// Per-session shell state
#[derive(Debug, Clone)]
pub struct SessionState {
    current_dir: PathBuf,
    previous_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    history: Vec<String>,
    startup: Startup,
}

impl SessionState {
    /// Capture the process's current directory and environment
    pub fn new() -> Result<Self> {
        let dir = std::env::current_dir()?;
        let env = std::env::vars().collect();
        Self::with_startup(dir, env)
    }

    /// Start a session from an explicit directory and environment
    pub fn with_startup(dir: impl AsRef<Path>, env: BTreeMap<String, String>) -> Result<Self> {
        let dir = dir.as_ref().canonicalize()?;
        let startup = Startup {
            dir: dir.clone(),
            env: env.clone(),
        };
        Ok(Self {
            current_dir: dir,
            previous_dir: None,
            env,
            history: Vec::new(),
            startup,
        })
    }

    /// Restore the startup directory and environment and clear history
    pub fn reset(&mut self) {
        debug!("Resetting session to {}", self.startup.dir.display());
        self.current_dir = self.startup.dir.clone();
        self.previous_dir = None;
        self.env = self.startup.env.clone();
        self.history.clear();
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn previous_dir(&self) -> Option<&Path> {
        self.previous_dir.as_deref()
    }

    /// Directory the session started in
    pub fn startup_dir(&self) -> &Path {
        &self.startup.dir
    }

    /// Commit a directory change; `dir` must already be resolved and exist
    pub(crate) fn change_dir(&mut self, dir: PathBuf) {
        let old = std::mem::replace(&mut self.current_dir, dir);
        self.env
            .insert("OLDPWD".to_string(), old.to_string_lossy().into_owned());
        self.env.insert(
            "PWD".to_string(),
            self.current_dir.to_string_lossy().into_owned(),
        );
        self.previous_dir = Some(old);
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.insert(name.into(), value.into());
    }

    pub fn remove_var(&mut self, name: &str) -> Option<String> {
        self.env.remove(name)
    }

    /// Home directory as seen by this session
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(|| crate::platform::Platform::paths().home_dir())
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Record an issued command
    pub fn push_history(&mut self, command: impl Into<String>) {
        self.history.push(command.into());
    }
}
