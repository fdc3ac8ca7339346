use cookify_core::WriteMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the favorites file
    pub data_dir: ConfigValue<PathBuf>,
    /// Recipe catalog base URL
    pub api_url: ConfigValue<String>,
    /// Per-request catalog timeout, in seconds
    pub request_timeout_secs: ConfigValue<u64>,
    /// Ordering of concurrent favorite writes
    pub write_mode: ConfigValue<WriteMode>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    write_mode: Option<WriteMode>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut api_url = ConfigValue::new(
            cookify_core::DEFAULT_API_URL.to_string(),
            ConfigSource::Default,
        );
        let mut request_timeout_secs = ConfigValue::new(
            cookify_core::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            ConfigSource::Default,
        );
        // The CLI queues writes; the library default stays last-write-wins.
        let mut write_mode = ConfigValue::new(WriteMode::Serialized, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                request_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(mode) = file_config.write_mode {
                write_mode = ConfigValue::new(mode, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("COOKIFY_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("COOKIFY_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("COOKIFY_REQUEST_TIMEOUT") {
            let secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("COOKIFY_REQUEST_TIMEOUT", secs.clone()))?;
            request_timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(mode) = std::env::var("COOKIFY_WRITE_MODE") {
            let mode = mode
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("COOKIFY_WRITE_MODE", mode.clone()))?;
            write_mode = ConfigValue::new(mode, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            api_url,
            request_timeout_secs,
            write_mode,
            config_file,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/cookify/
    /// - macOS: ~/Library/Application Support/cookify/
    /// - Windows: %APPDATA%/cookify/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cookify")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/cookify/
    /// - macOS: ~/Library/Application Support/cookify/
    /// - Windows: %APPDATA%/cookify/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cookify")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
