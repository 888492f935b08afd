//! Configuration loading.
//!
//! Configuration covers the ambient knobs only (log level, output and spill
//! paths); mining parameters always come from the command line. Sources are
//! merged via figment with precedence, highest first:
//!
//! 1. `PHRASEMINE_*` environment variables
//! 2. Explicit config files (TOML or JSON, added via [`ConfigLoader::with_file`])
//! 3. Default values

use camino::Utf8PathBuf;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// The configuration for phrasemine.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Default path of the result CSV. The CLI falls back to
    /// `results_max.csv` in the current directory when unset.
    pub output: Option<Utf8PathBuf>,
    /// Path of the binary corpus file used in on-disk mode.
    pub spill_path: Option<Utf8PathBuf>,
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: Into<Utf8PathBuf>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.into());
        self
    }

    /// Load configuration, merging all sources.
    #[tracing::instrument(skip(self), fields(files = self.explicit_files.len()))]
    pub fn load(self) -> ConfigResult<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        for file in &self.explicit_files {
            figment = match file.extension() {
                Some("json") => figment.merge(Json::file(file.as_std_path())),
                _ => figment.merge(Toml::file(file.as_std_path())),
            };
        }
        figment = figment.merge(Env::prefixed("PHRASEMINE_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(log_level = config.log_level.as_str(), "configuration loaded");
        Ok(config)
    }
}
