//! Analyzer configuration
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! base_url = "v1/interface/:systemId"
//! system_id = "S1"
//! api_name = "imagine"
//! use_aliases = true
//! units = ["soilMoisture"]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{BlueprintOptions, Units};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

const DEFAULT_BASE_URL: &str = "v1/interface/:systemId";
const DEFAULT_API_NAME: &str = "imagine";

/// Configuration for relationship analysis
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Prefix of every root url path
    pub base_url: String,
    /// Value for `:systemId` segments when the match does not supply one
    pub system_id: Option<String>,
    /// Api name stamped on every relationship
    pub api_name: String,
    /// Key blueprints by alias instead of id
    pub use_aliases: bool,
    /// Extra unit-of-measure type names
    pub units: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            system_id: None,
            api_name: DEFAULT_API_NAME.to_string(),
            use_aliases: true,
            units: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = Some(system_id.into());
        self
    }

    pub fn with_api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = api_name.into();
        self
    }

    pub fn with_aliases(mut self, use_aliases: bool) -> Self {
        self.use_aliases = use_aliases;
        self
    }

    /// Options for building blueprints under this configuration
    pub fn blueprint_options(&self) -> BlueprintOptions {
        BlueprintOptions::default().with_aliases(self.use_aliases)
    }

    /// Unit catalog: builtin units plus the configured extras
    pub fn units(&self) -> Units {
        Units::new().with_types(self.units.iter().cloned())
    }
}
