//! @dose
//! purpose: Configuration file parsing for gavel.toml. Holds the startup log level, the
//!     suffix stripped from command-group type names, and the binder's diagnostic mode.
//!
//! when-editing:
//!     - !Config is loaded once at startup, before logging is installed
//!     - !Every field has a default; a missing file is not an error
//!
//! invariants:
//!     - Config::load returns default config if gavel.toml doesn't exist or can't be parsed
//!     - Log level names are matched ignoring case, same as the -log switch
//!
//! gotchas:
//!     - Load problems go to stderr directly since the subscriber isn't up yet

use crate::binder::BindOptions;
use crate::logging::LogLevel;
use crate::names::DEFAULT_GROUP_SUFFIX;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "gavel.toml";

/// Main configuration structure matching gavel.toml
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
    pub binding: BindingConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Threshold used until a -log switch changes it
    pub level: LogLevel,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Suffix stripped from group type names without an alias
    pub group_suffix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            group_suffix: DEFAULT_GROUP_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BindingConfig {
    /// Report every failing parameter instead of stopping at the first
    pub collect_all_diagnostics: bool,
}

impl Config {
    /// Load configuration from gavel.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn bind_options(&self) -> BindOptions {
        BindOptions {
            collect_all: self.binding.collect_all_diagnostics,
        }
    }
}
