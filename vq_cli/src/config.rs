//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::path::PathBuf;
use volley_queue::{Criterion, GameMode, GameSettings, parse_criteria};

/// Default location of the saved state
pub const DEFAULT_DATA_FILE: &str = "volley_queue.json";

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Where the state snapshot is read from and written to
    pub data_file: PathBuf,
    /// Game mode override applied on top of the saved settings
    pub default_mode: Option<GameMode>,
    /// Formation order override applied on top of the saved settings
    pub formation_priority: Option<Vec<Criterion>>,
    /// Whether to save after every mutating command
    pub autosave: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            default_mode: None,
            formation_priority: None,
            autosave: true,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `data_override` - Optional data file override (from CLI args)
    /// * `mode_override` - Optional game mode override (from CLI args)
    /// * `no_save` - Disable autosave (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but invalid
    pub fn from_env(
        data_override: Option<PathBuf>,
        mode_override: Option<GameMode>,
        no_save: bool,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            data_override,
            mode_override,
            no_save,
        )
    }

    /// Same as [`CliConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(
        lookup: F,
        data_override: Option<PathBuf>,
        mode_override: Option<GameMode>,
        no_save: bool,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = data_override
            .or_else(|| lookup("VQ_DATA_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let default_mode = match mode_override {
            Some(mode) => Some(mode),
            None => lookup("VQ_DEFAULT_MODE")
                .map(|value| {
                    value.parse::<GameMode>().map_err(|e| ConfigError::Invalid {
                        var: "VQ_DEFAULT_MODE".to_string(),
                        reason: e.to_string(),
                    })
                })
                .transpose()?,
        };

        let formation_priority = lookup("VQ_FORMATION_PRIORITY")
            .map(|value| {
                parse_criteria(&value).map_err(|e| ConfigError::Invalid {
                    var: "VQ_FORMATION_PRIORITY".to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let autosave = !no_save && parse_or(lookup("VQ_AUTOSAVE"), true);

        let config = CliConfig {
            data_file,
            default_mode,
            formation_priority,
            autosave,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns error if the data file path or formation order is unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "VQ_DATA_FILE".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.data_file.is_dir() {
            return Err(ConfigError::Invalid {
                var: "VQ_DATA_FILE".to_string(),
                reason: format!("{} is a directory", self.data_file.display()),
            });
        }

        if self
            .formation_priority
            .as_ref()
            .is_some_and(|order| order.is_empty())
        {
            return Err(ConfigError::Invalid {
                var: "VQ_FORMATION_PRIORITY".to_string(),
                reason: "Must name at least one criterion".to_string(),
            });
        }

        Ok(())
    }

    /// Apply the configured overrides to loaded settings.
    pub fn apply_to(&self, settings: &mut GameSettings) {
        if let Some(mode) = self.default_mode {
            settings.default_game_mode = mode;
        }
        if let Some(order) = &self.formation_priority {
            settings.team_formation_priority = order.clone();
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an optional value with default fallback
fn parse_or<T>(value: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
