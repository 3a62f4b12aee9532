//! Unix filesystem operations

use crate::error::{Error, Result};
use crate::platform::traits::FilesystemOps;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub struct UnixFilesystem;

impl UnixFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for UnixFilesystem {
    fn is_executable(&self, path: &Path) -> bool {
        if let Ok(metadata) = path.metadata() {
            if metadata.is_file() {
                return (metadata.permissions().mode() & 0o111) != 0;
            }
        }
        false
    }

    fn list_executables(&self, dir: &Path) -> Vec<String> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                trace!("Skipping PATH entry {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        entries
            .flatten()
            .filter(|entry| self.is_executable(&entry.path()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }

    fn find_command(&self, command: &str) -> Result<Option<PathBuf>> {
        let output = Command::new("which")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| Error::Other(format!("Failed to run which: {}", e)))?;

        if !output.status.success() {
            return Ok(None);
        }

        let path_str = String::from_utf8(output.stdout)
            .map_err(|e| Error::Other(format!("Failed to parse which output: {}", e)))?;
        let path = PathBuf::from(path_str.trim());
        if path.exists() {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}
