//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::is_supported_encoding;
use crate::config::Buffering;
use crate::error::{LockStreamError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockStreamError::Config)` - Read or parse error
    /// * `Err(LockStreamError::InvalidArgument)` - Validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockStreamError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockStreamError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            LockStreamError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - an explicit buffer size must be positive
    /// - `encoding`, when set, must name UTF-8
    pub fn validate(&self) -> Result<()> {
        if self.buffering == Buffering::Size(0) {
            return Err(LockStreamError::invalid("invalid buffering size"));
        }

        if let Some(encoding) = &self.encoding
            && !is_supported_encoding(encoding)
        {
            return Err(LockStreamError::invalid(format!(
                "unsupported encoding: '{}'",
                encoding
            )));
        }

        Ok(())
    }

    /// Name of the first text-only option that is set.
    pub(crate) fn text_option_name(&self) -> Option<&'static str> {
        if self.encoding.is_some() {
            Some("encoding")
        } else if self.errors.is_some() {
            Some("errors")
        } else if self.newline.is_some() {
            Some("newline")
        } else {
            None
        }
    }
}
