//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --currency usd --db ./till.db --hide-amounts                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     COUNTNOTE_CURRENCY=USD                                             │
//! │     COUNTNOTE_DB_PATH=/var/lib/countnote/countnote.db                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/countnote/countnote.toml (Linux)                         │
//! │     ~/Library/Application Support/com.countnote.countnote/ (macOS)     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     INR, amounts visible, magnitude policy, unbounded history          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # countnote.toml
//! database_path = "/home/me/countnote.db"
//! currency = "USD"
//! hide_amounts = false
//! negative_policy = "magnitude"   # magnitude | clamp_to_zero
//! history_limit = 50              # omit to keep every snapshot
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;

use countnote_core::{Currency, NegativePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::Cli;

/// Database file name inside the platform data directory.
const DATABASE_FILE: &str = "countnote.db";

/// Config file name inside the platform config directory.
const CONFIG_FILE: &str = "countnote.toml";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("history_limit must be at least 1 (omit it to keep every snapshot)")]
    ZeroHistoryLimit,

    #[error("No data directory available; pass --db or set COUNTNOTE_DB_PATH")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// App Config
// =============================================================================

/// Runtime settings for the command-line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Currency used when `--currency` is not given.
    pub currency: Currency,

    /// Mask amounts in every listing.
    pub hide_amounts: bool,

    /// What the count evaluator does with a negative result.
    pub negative_policy: NegativePolicy,

    /// Keep only the newest N snapshots per currency.
    pub history_limit: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            currency: Currency::Inr,
            hide_amounts: false,
            negative_policy: NegativePolicy::Magnitude,
            history_limit: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (countnote.toml)
    /// 3. Environment variables
    ///
    /// Command-line flags are applied afterwards with [`AppConfig::apply_cli`].
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parses a `countnote.toml` document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `COUNTNOTE_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup. Unparseable values are errors
    /// rather than being silently ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("COUNTNOTE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(code) = lookup("COUNTNOTE_CURRENCY") {
            self.currency = code.parse().map_err(|e: countnote_core::CoreError| {
                ConfigError::InvalidValue {
                    key: "COUNTNOTE_CURRENCY",
                    value: code.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(flag) = lookup("COUNTNOTE_HIDE_AMOUNTS") {
            self.hide_amounts = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidValue {
                key: "COUNTNOTE_HIDE_AMOUNTS",
                value: flag.clone(),
                reason: "expected true/false, yes/no or 1/0".to_string(),
            })?;
        }

        if let Some(policy) = lookup("COUNTNOTE_NEGATIVE_POLICY") {
            self.negative_policy =
                policy
                    .parse()
                    .map_err(|reason: String| ConfigError::InvalidValue {
                        key: "COUNTNOTE_NEGATIVE_POLICY",
                        value: policy.clone(),
                        reason,
                    })?;
        }

        if let Some(limit) = lookup("COUNTNOTE_HISTORY_LIMIT") {
            let parsed = limit
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "COUNTNOTE_HISTORY_LIMIT",
                    value: limit.clone(),
                    reason: e.to_string(),
                })?;
            self.history_limit = Some(parsed);
        }

        Ok(())
    }

    /// Applies the global command-line flags.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(currency) = cli.currency {
            self.currency = currency;
        }
        if let Some(ref path) = cli.db {
            self.database_path = Some(path.clone());
        }
        if cli.hide_amounts {
            self.hide_amounts = true;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == Some(0) {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        Ok(())
    }

    /// Retention cap for the history archive.
    pub fn history_limit(&self) -> Option<NonZeroUsize> {
        self.history_limit.and_then(NonZeroUsize::new)
    }

    /// Resolves the database file, creating the platform data directory when
    /// no explicit path is configured.
    pub fn resolve_database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "countnote", "countnote")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.currency, Currency::Inr);
        assert!(!config.hide_amounts);
        assert_eq!(config.negative_policy, NegativePolicy::Magnitude);
        assert_eq!(config.history_limit(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_file() {
        let config = AppConfig::from_toml_str(
            r#"
            currency = "USD"
            negative_policy = "clamp_to_zero"
            history_limit = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.currency, Currency::Usd);
        assert_eq!(config.negative_policy, NegativePolicy::ClampToZero);
        assert_eq!(config.history_limit().map(NonZeroUsize::get), Some(25));
        assert!(!config.hide_amounts);
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_toml_rejects_unknown_currency() {
        assert!(matches!(
            AppConfig::from_toml_str(r#"currency = "EUR""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::from_toml_str(r#"currency = "USD""#).unwrap();
        config
            .apply_overrides(env(&[
                ("COUNTNOTE_CURRENCY", "inr"),
                ("COUNTNOTE_HIDE_AMOUNTS", "yes"),
                ("COUNTNOTE_NEGATIVE_POLICY", "clamp"),
                ("COUNTNOTE_DB_PATH", "/tmp/till.db"),
                ("COUNTNOTE_HISTORY_LIMIT", "5"),
            ]))
            .unwrap();

        assert_eq!(config.currency, Currency::Inr);
        assert!(config.hide_amounts);
        assert_eq!(config.negative_policy, NegativePolicy::ClampToZero);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/till.db")));
        assert_eq!(config.history_limit, Some(5));
    }

    #[test]
    fn test_invalid_env_value_is_an_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(env(&[("COUNTNOTE_HIDE_AMOUNTS", "maybe")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "COUNTNOTE_HIDE_AMOUNTS",
                ..
            })
        ));

        let result = config.apply_overrides(env(&[("COUNTNOTE_CURRENCY", "EUR")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[("COUNTNOTE_HISTORY_LIMIT", "0")]))
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroHistoryLimit)
        ));
    }

    #[test]
    fn test_flags_win() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[("COUNTNOTE_CURRENCY", "INR")]))
            .unwrap();

        let cli = Cli::try_parse_from([
            "countnote",
            "--currency",
            "USD",
            "--db",
            "./till.db",
            "--hide-amounts",
            "show",
        ])
        .unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.currency, Currency::Usd);
        assert_eq!(config.database_path, Some(PathBuf::from("./till.db")));
        assert!(config.hide_amounts);
    }

    #[test]
    fn test_explicit_database_path_is_used() {
        let config = AppConfig {
            database_path: Some(PathBuf::from("/srv/countnote.db")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/srv/countnote.db")
        );
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let path = std::env::temp_dir().join("countnote-does-not-exist.toml");
        let config = AppConfig::load(Some(path)).unwrap_or_default();
        assert!(config.validate().is_ok());
    }
}
