//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::loader::{ProximityMargin, DEFAULT_MARGIN_PX, LOADED_CLASS, PLACEHOLDER_IMAGE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deferred loader configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoaderConfig {
    /// Distance outside the viewport at which loading starts (logical px)
    #[serde(default = "default_proximity_margin")]
    pub proximity_margin: f64,

    /// Class added to an image once its real source is committed
    #[serde(default = "default_loaded_class")]
    pub loaded_class: String,

    /// Source shown until the element comes near the viewport
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_proximity_margin() -> f64 {
    DEFAULT_MARGIN_PX
}

fn default_loaded_class() -> String {
    LOADED_CLASS.to_string()
}

fn default_placeholder() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            proximity_margin: default_proximity_margin(),
            loaded_class: default_loaded_class(),
            placeholder: default_placeholder(),
        }
    }
}

impl LoaderConfig {
    /// Validated margin, `None` when negative or not finite
    pub fn margin(&self) -> Option<ProximityMargin> {
        ProximityMargin::new(self.proximity_margin)
    }

    /// Builder method: set the proximity margin
    pub fn proximity_margin(mut self, px: f64) -> Self {
        self.proximity_margin = px;
        self
    }

    /// Builder method: set the loaded class
    pub fn loaded_class(mut self, class: impl Into<String>) -> Self {
        self.loaded_class = class.into();
        self
    }
}

/// Simulated viewport configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f64,

    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    720.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    #[cfg(feature = "cli")]
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("lazyview").join("config.toml")),
            Some(PathBuf::from("./lazyview.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loader.margin().is_none() {
            return Err(ConfigError::Invalid(format!(
                "loader.proximity_margin must be a finite, non-negative number (got {})",
                self.loader.proximity_margin
            )));
        }

        if self.loader.loaded_class.trim().is_empty()
            || self.loader.loaded_class.contains(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "loader.loaded_class must be a single class name (got {:?})",
                self.loader.loaded_class
            )));
        }

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must have a positive size (got {}x{})",
                self.viewport.width, self.viewport.height
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Loader overrides
        if let Ok(margin) = std::env::var("LAZYVIEW_MARGIN") {
            match margin.parse() {
                Ok(px) => self.loader.proximity_margin = px,
                Err(e) => {
                    tracing::warn!("Ignoring LAZYVIEW_MARGIN={:?}: {}", margin, e);
                }
            }
        }
        if let Ok(class) = std::env::var("LAZYVIEW_LOADED_CLASS") {
            self.loader.loaded_class = class;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("LAZYVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LAZYVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Lazyview Configuration
#
# Environment variables override these settings:
# - LAZYVIEW_MARGIN
# - LAZYVIEW_LOADED_CLASS
# - LAZYVIEW_LOG_LEVEL
# - LAZYVIEW_LOG_FORMAT

[loader]
# Start loading this many pixels before an image scrolls into view
proximity_margin = 50.0

# Class added to an image once its real source is set
loaded_class = "loaded"

# Source shown until then (defaults to a neutral 200x200 SVG rectangle)
# placeholder = "data:image/svg+xml,..."

[viewport]
# Viewport used by `lazyview simulate`
width = 1280.0
height = 720.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
