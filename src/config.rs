//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/branching-range/branching-range.toml`
//! 3. Local config: an explicit TOML file passed to [`Settings::load`]
//! 4. Environment variables: `BRANCHING_RANGE__*`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

const APP_NAME: &str = "branching-range";
const ENV_PREFIX: &str = "BRANCHING_RANGE";

/// Defaults applied to every node a forest creates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Enforced upper bound on segments per node (None = unbounded)
    pub split_capacity: Option<usize>,
    /// Enforced upper bound on branches per segment (None = unbounded)
    pub branch_capacity: Option<usize>,
    /// Weight of freshly created segments
    pub default_weight: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            split_capacity: None,
            branch_capacity: None,
            default_weight: 0.0,
        }
    }
}

/// Raw settings for intermediate parsing; `None` means "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub split_capacity: Option<usize>,
    pub branch_capacity: Option<usize>,
    pub default_weight: Option<f64>,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| Error::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            split_capacity: overlay.split_capacity.or(self.split_capacity),
            branch_capacity: overlay.branch_capacity.or(self.branch_capacity),
            default_weight: overlay.default_weight.unwrap_or(self.default_weight),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_path` - Optional TOML file layered over the global config.
    ///   A missing file is an error; a missing global file is not.
    #[instrument(level = "debug")]
    pub fn load(local_path: Option<&Path>) -> Result<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("Loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = local_path {
            debug!("Loading local config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply `BRANCHING_RANGE__*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("split_capacity") {
            settings.split_capacity = Some(val);
        }
        if let Ok(val) = config.get::<usize>("branch_capacity") {
            settings.branch_capacity = Some(val);
        }
        if let Ok(val) = config.get::<f64>("default_weight") {
            settings.default_weight = val;
        }

        Ok(settings)
    }

    /// Parse settings from TOML text, starting from compiled defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(content).map_err(|e| Error::Config {
            message: format!("parse: {e}"),
        })?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# branching-range configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/branching-range/branching-range.toml
#   Local:  any file passed to Settings::load
#   Env:    BRANCHING_RANGE__* environment variables

# Maximum number of segments per node (omit for unbounded)
# split_capacity = 8

# Maximum number of branches per segment (omit for unbounded)
# branch_capacity = 4

# Weight given to newly created segments
# default_weight = 0.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> Error {
    Error::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_capacities_unbounded() {
        let settings = Settings::default();
        assert_eq!(settings.split_capacity, None);
        assert_eq!(settings.branch_capacity, None);
        assert_eq!(settings.default_weight, 0.0);
    }

    #[test]
    fn given_partial_overlay_when_merged_then_unspecified_fields_kept() {
        let base = Settings {
            split_capacity: Some(4),
            branch_capacity: Some(2),
            default_weight: 1.5,
        };
        let overlay = RawSettings {
            split_capacity: None,
            branch_capacity: Some(7),
            default_weight: None,
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.split_capacity, Some(4));
        assert_eq!(result.branch_capacity, Some(7));
        assert_eq!(result.default_weight, 1.5);
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let settings = Settings::from_toml(&Settings::template()).expect("parse template");
        assert_eq!(settings, Settings::default());
    }
}
