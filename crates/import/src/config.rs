use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::locale::LocalePack;

/// Largest `semicolon_bias` a config file may set.
pub const MAX_SEMICOLON_BIAS: u32 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for a single analysis run. Every scan stays bounded by these
/// limits no matter how large the file is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Non-blank lines examined when looking for the header row.
    pub header_scan_limit: usize,
    /// Data rows kept after the header for preview and dialect probing.
    pub sample_row_limit: usize,
    /// Dialects below this confidence need an explicit confirmation.
    pub low_confidence_threshold: f32,
    /// European signals added when the file is semicolon-delimited.
    pub semicolon_bias: u32,
    /// Replaces the built-in vocabulary when present.
    pub locale: Option<LocalePack>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            header_scan_limit: 20,
            sample_row_limit: 5,
            low_confidence_threshold: 0.7,
            semicolon_bias: 2,
            locale: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(toml_content)?;
        config.validated()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.header_scan_limit == 0 {
            return Err(ConfigError::Invalid(
                "header_scan_limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "low_confidence_threshold must be within 0..=1, got {}",
                self.low_confidence_threshold
            )));
        }
        if self.semicolon_bias > MAX_SEMICOLON_BIAS {
            return Err(ConfigError::Invalid(format!(
                "semicolon_bias must be at most {MAX_SEMICOLON_BIAS}, got {}",
                self.semicolon_bias
            )));
        }
        self.locale = self.locale.map(LocalePack::normalized).transpose()?;
        Ok(self)
    }

    /// The configured vocabulary, or the built-in one.
    pub fn locale_pack(&self) -> LocalePack {
        self.locale.clone().unwrap_or_else(LocalePack::seed)
    }
}
