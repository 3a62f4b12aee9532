//! Error types and Result aliases for ifw

use std::path::PathBuf;

/// Result type alias for ifw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ifw
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === PTY-related errors ===
    /// Failed to allocate a PTY pair
    #[error("Failed to create PTY for command '{command}': {reason}")]
    PtyCreationFailed { command: String, reason: String },

    /// Failed to spawn the shell on the PTY slave
    #[error("Failed to spawn command '{command}': {reason}")]
    CommandSpawnFailed { command: String, reason: String },

    /// Terminal attribute or size operation failed
    #[error("Terminal error: {reason}")]
    Terminal { reason: String },

    /// Failed to send signal to process group
    #[error("Failed to send signal '{signal}': {reason}")]
    SignalSendFailed { signal: String, reason: String },

    // === Builtin errors ===
    /// `cd -` before any directory change
    #[error("No previous directory")]
    NoPreviousDirectory,

    /// `cd` target does not exist
    #[error("cd: no such file or directory: {target}")]
    DirectoryNotFound { target: String },

    /// `cd` target exists but is not a directory
    #[error("cd: not a directory: {target}")]
    NotADirectory { target: String },

    /// Home directory could not be determined
    #[error("cd: HOME not set")]
    HomeNotFound,

    /// `export`/`unset` with a malformed variable name
    #[error("{builtin}: `{name}': not a valid identifier")]
    InvalidIdentifier { builtin: String, name: String },

    // === Configuration errors ===
    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Failed to parse configuration
    #[error("Failed to parse {format} config at '{}': {reason}", path.display())]
    ConfigParseFailed {
        path: PathBuf,
        format: String,
        reason: String,
    },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System call errors
    #[error("System error: {0}")]
    Nix(#[from] nix::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Render the error using the user-facing `❌` convention
    pub fn to_display_text(&self) -> String {
        format!("❌ {}", self)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
