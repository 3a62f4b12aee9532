//! Unix shell operations

use crate::platform::traits::ShellOps;
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Matches bash (`alias ll='ls -l'`) and zsh (`ll='ls -l'`) listings
static ALIAS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:alias\s+)?([^=\s]+)=").expect("valid alias regex"));

pub struct UnixShell;

impl UnixShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellOps for UnixShell {
    fn default_shell(&self) -> PathBuf {
        if let Ok(shell) = env::var("SHELL") {
            PathBuf::from(shell)
        } else {
            PathBuf::from("/bin/bash")
        }
    }

    fn list_aliases(&self, shell: &Path, timeout: Duration) -> Vec<String> {
        // stdin is detached so an interactive shell never grabs the terminal
        let mut child = match Command::new(shell)
            .args(["-i", "-c", "alias"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("Alias listing via {} failed: {}", shell.display(), e);
                return Vec::new();
            }
        };

        // Drain stdout while the shell runs so a long listing never fills the pipe
        let (tx, rx) = mpsc::channel();
        let stdout = child.stdout.take();
        let reader = thread::Builder::new()
            .name("ifw-alias-reader".to_string())
            .spawn(move || {
                let mut listing = String::new();
                if let Some(mut pipe) = stdout {
                    let _ = pipe.read_to_string(&mut listing);
                }
                let _ = tx.send(listing);
            });
        if let Err(e) = reader {
            debug!("Could not start alias reader: {}", e);
            let _ = child.kill();
            let _ = child.wait();
            return Vec::new();
        }

        let deadline = Instant::now() + timeout;
        let listing = rx.recv_timeout(timeout).ok();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) if listing.is_none() || Instant::now() >= deadline => break None,
                Ok(None) => thread::sleep(Duration::from_millis(20)),
                Err(_) => break None,
            }
        };

        let (Some(status), Some(listing)) = (status.filter(|s| s.success()), listing) else {
            let _ = child.kill();
            let _ = child.wait();
            debug!("Alias listing via {} timed out or failed", shell.display());
            return Vec::new();
        };
        trace!("Alias listing exited with {}", status);

        parse_alias_names(&listing)
    }
}

/// Extract alias names from `alias` builtin output
pub fn parse_alias_names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| ALIAS_LINE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
