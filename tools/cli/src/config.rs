//! Configuration for the fake target behind the console.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regctx_core::TargetCapabilities;

/// Errors loading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(String),
    #[error("cannot parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The simulated target the console drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Streaming vector length in bytes.
    pub svl: usize,
    /// Start in streaming mode.
    pub streaming: bool,
    /// Extensions present on the simulated target.
    pub capabilities: TargetCapabilities,
    /// Pre-load the recognizable register fixture.
    pub fixture: bool,
    /// Thread id reported in log output.
    pub thread: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            svl: 32,
            streaming: false,
            capabilities: TargetCapabilities::sme_only(),
            fixture: true,
            thread: 1,
        }
    }
}

impl TargetConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: TargetConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svl < 16 || self.svl > 256 || self.svl % 16 != 0 {
            return Err(ConfigError::Invalid(format!(
                "svl must be a multiple of 16 in [16, 256], got {}",
                self.svl
            )));
        }
        if self.streaming && !self.capabilities.sme {
            return Err(ConfigError::Invalid(
                "streaming mode needs the sme capability".to_string(),
            ));
        }
        Ok(())
    }
}
