//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! root_id = "greeting"
//! fallback_message = "I'm not sure about that. Let me show you the main options."
//! thinking_delay_ms = 500
//! strict_references = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use content_graph::DEFAULT_ROOT;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a [`Navigator`](crate::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Id of the root greeting, also used as the root context marker.
    pub root_id: String,

    /// Apology shown before the greeting when a selection resolves to nothing.
    pub fallback_message: String,

    /// How long the presentation layer shows its "thinking" placeholder.
    pub thinking_delay_ms: u64,

    /// Refuse graphs with unresolved option references instead of warning.
    pub strict_references: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT.to_string(),
            fallback_message: "I'm not sure about that. Let me show you the main options."
                .to_string(),
            thinking_delay_ms: 500,
            strict_references: false,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from TOML; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_id.trim().is_empty() {
            return Err(ConfigError::Invalid("root_id must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}
