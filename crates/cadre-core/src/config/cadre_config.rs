//! Top-level Cadre configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EmissionConfig, ResolutionConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CADRE_*`)
/// 3. Project config (`cadre.toml` in the model root)
/// 4. User config (`~/.cadre/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CadreConfig {
    pub resolution: ResolutionConfig,
    pub emission: EmissionConfig,
}

/// Override arguments a host tool can apply on top of every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_iterations: Option<usize>,
    pub check_rules: Option<bool>,
    pub write_helpers: Option<bool>,
}

impl CadreConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: CadreConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CadreConfig) -> Result<(), ConfigError> {
        if config.resolution.max_iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "resolution.max_iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.cadre/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".cadre").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CadreConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CadreConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut CadreConfig, other: &CadreConfig) {
        if other.resolution.max_iterations.is_some() {
            base.resolution.max_iterations = other.resolution.max_iterations;
        }
        if other.resolution.check_rules.is_some() {
            base.resolution.check_rules = other.resolution.check_rules;
        }
        if other.emission.write_helpers.is_some() {
            base.emission.write_helpers = other.emission.write_helpers;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CADRE_RESOLUTION_MAX_ITERATIONS`, `CADRE_EMISSION_WRITE_HELPERS`, etc.
    fn apply_env_overrides(config: &mut CadreConfig) {
        if let Ok(val) = std::env::var("CADRE_RESOLUTION_MAX_ITERATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.resolution.max_iterations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CADRE_RESOLUTION_CHECK_RULES") {
            if let Ok(v) = val.parse::<bool>() {
                config.resolution.check_rules = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CADRE_EMISSION_WRITE_HELPERS") {
            if let Ok(v) = val.parse::<bool>() {
                config.emission.write_helpers = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut CadreConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.max_iterations {
            config.resolution.max_iterations = Some(v);
        }
        if let Some(v) = overrides.check_rules {
            config.resolution.check_rules = Some(v);
        }
        if let Some(v) = overrides.write_helpers {
            config.emission.write_helpers = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
