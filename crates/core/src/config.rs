//! TOML-based configuration for the Rollcall console.

use crate::error::{Result, RollcallError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level console configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub labels: LabelConfig,
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".into()
}

fn default_timeout_secs() -> u64 {
    30
}

/// External ZPL label renderer settings (certificate preview).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_render_url")]
    pub render_url: String,
    /// Print density in dots per millimetre.
    #[serde(default = "default_dpmm")]
    pub dpmm: u8,
    #[serde(default = "default_width_in")]
    pub width_in: f32,
    #[serde(default = "default_height_in")]
    pub height_in: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            render_url: default_render_url(),
            dpmm: default_dpmm(),
            width_in: default_width_in(),
            height_in: default_height_in(),
        }
    }
}

fn default_render_url() -> String {
    "https://api.labelary.com".into()
}

fn default_dpmm() -> u8 {
    8
}

fn default_width_in() -> f32 {
    4.0
}

fn default_height_in() -> f32 {
    6.0
}

const SUPPORTED_DPMM: [u8; 4] = [6, 8, 12, 24];

impl ConsoleConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RollcallError::Config(format!("failed to parse config: {e}")))
    }

    /// Validate the configuration, returning an error for invalid values.
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(RollcallError::Config(
                "api.base_url must not be empty".into(),
            ));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(RollcallError::Config(format!(
                "api.base_url must be an http(s) URL, got {base}"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(RollcallError::Config(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }

        if self.labels.render_url.trim().is_empty() {
            return Err(RollcallError::Config(
                "labels.render_url must not be empty".into(),
            ));
        }
        if !SUPPORTED_DPMM.contains(&self.labels.dpmm) {
            return Err(RollcallError::Config(format!(
                "labels.dpmm must be one of {SUPPORTED_DPMM:?}, got {}",
                self.labels.dpmm
            )));
        }
        if self.labels.width_in <= 0.0 || self.labels.height_in <= 0.0 {
            return Err(RollcallError::Config(
                "labels.width_in and labels.height_in must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Generate a sensible default configuration.
    pub fn generate_default() -> Self {
        Self::default()
    }
}
