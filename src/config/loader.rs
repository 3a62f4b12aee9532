//! Configuration File Loading
//!
//! Handles locating, parsing and validating configuration files with a
//! fallback to built-in defaults.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "IFW_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Path the configuration was loaded from, if any
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration from the default locations, or defaults if none exist
    pub fn load() -> Result<Config> {
        let mut loader = Self::new();
        loader.load_config()
    }

    /// Load configuration from an explicit file
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let loader = Self::new();
        let config = loader.load_config_file(path, ConfigFormat::from_path(path))?;
        loader.validate_config(&config)?;
        Ok(config)
    }

    /// Search for a configuration file and load it
    pub fn load_config(&mut self) -> Result<Config> {
        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(Error::ConfigNotFound);
            }
            let config = self.load_config_file(&path, ConfigFormat::from_path(&path))?;
            self.validate_config(&config)?;
            self.current_path = Some(path);
            return Ok(config);
        }

        if let Some((path, config)) = self.find_and_load_config()? {
            debug!("Configuration loaded from {}", path.display());
            self.validate_config(&config)?;
            self.current_path = Some(path);
            return Ok(config);
        }

        let config = Config::default();
        self.validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match self.load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            warn!(
                                "Failed to load config from {}: {}",
                                config_path.display(),
                                e
                            );
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                path: path.to_path_buf(),
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    path: path.to_path_buf(),
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        use crate::platform::Platform;

        let mut paths = Vec::new();

        if let Ok(config_dir) = Platform::paths().config_dir() {
            paths.push(config_dir.join("ifw").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ifw").join("config"));
        }

        paths
    }

    /// Validate configuration
    fn validate_config(&self, config: &Config) -> Result<()> {
        if config.shell.fallback.as_os_str().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "shell.fallback".to_string(),
                reason: "Fallback shell cannot be empty".to_string(),
            });
        }

        if config.pty.default_rows == 0 || config.pty.default_cols == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.default_rows/default_cols".to_string(),
                reason: "Terminal dimensions must be greater than 0".to_string(),
            });
        }

        if config.pty.read_buffer_size == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.read_buffer_size".to_string(),
                reason: "PTY buffer size must be greater than 0".to_string(),
            });
        }

        if config.pty.stdin_buffer_size == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "pty.stdin_buffer_size".to_string(),
                reason: "Stdin buffer size must be greater than 0".to_string(),
            });
        }

        let ratio = config.classifier.stopword_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(Error::ConfigValidationFailed {
                field: "classifier.stopword_ratio".to_string(),
                reason: "Ratio must be in (0, 1]".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path the configuration was loaded from
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
