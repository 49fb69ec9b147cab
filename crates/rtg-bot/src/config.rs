//! Application configuration.

use crate::error::{AppError, AppResult};
use rtg_mm::QuoterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Event feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Newline-delimited JSON event file. `None` reads stdin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Bounded channel between the feed reader and the engine task.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log the Prometheus text exposition when the feed ends.
    #[serde(default = "default_true")]
    pub dump_metrics_on_exit: bool,
}

fn default_log_level() -> String {
    "info,rtg=debug".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dump_metrics_on_exit: true,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub quoter: QuoterConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Resolved config path.
    pub path: String,
    /// False when the file was missing and defaults were used.
    pub from_file: bool,
}

impl AppConfig {
    /// Resolve the config path (CLI > `RTG_CONFIG` > default) and load it,
    /// falling back to defaults if the file does not exist.
    pub fn load(cli_path: Option<String>) -> AppResult<LoadedConfig> {
        let path = cli_path
            .or_else(|| std::env::var("RTG_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_or_default(&path)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> AppResult<LoadedConfig> {
        let from_file = Path::new(path).exists();
        let config = if from_file {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        Ok(LoadedConfig {
            config,
            path: path.to_string(),
            from_file,
        })
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.quoter.validate()?;
        if config.feed.channel_capacity == 0 {
            return Err(AppError::Config(
                "feed.channel_capacity must be positive".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.feed.source.is_none());
        assert_eq!(config.feed.channel_capacity, 1024);
        assert_eq!(config.telemetry.log_level, "info,rtg=debug");
        assert_eq!(config.quoter.quote_action_ceiling, 14);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
[quoter]
instrument = 0
tick_size = 100
window_ms = 500

[feed]
source = "events.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(config.quoter.window_ms, 500);
        assert_eq!(config.feed.source.as_deref(), Some("events.jsonl"));
        assert_eq!(config.feed.channel_capacity, 1024);
    }

    #[test]
    fn test_invalid_quoter_section_rejected() {
        let result = AppConfig::from_toml(
            r#"
[quoter]
breakpoints = [0, 10]
ladder = [{ bid = 1, ask = 1 }]
"#,
        );
        assert!(matches!(result, Err(AppError::Quoter(_))));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped =
            AppConfig::from_toml(include_str!("../../../config/default.toml")).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(shipped.quoter.breakpoints, defaults.quoter.breakpoints);
        assert_eq!(shipped.quoter.ladder, defaults.quoter.ladder);
        assert_eq!(shipped.quoter.level_weights, defaults.quoter.level_weights);
        assert_eq!(shipped.quoter.max_ask, defaults.quoter.max_ask);
        assert!(shipped.feed.source.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = AppConfig::load_or_default("does/not/exist.toml").unwrap();
        assert!(!loaded.from_file);
        assert_eq!(loaded.path, "does/not/exist.toml");
        assert_eq!(loaded.config.quoter.reprice_action_ceiling, 16);
    }

    #[test]
    fn test_cli_path_takes_precedence() {
        let path = std::env::temp_dir().join("rtg_bot_cli_config_test.toml");
        std::fs::write(&path, "[quoter]\nwindow_ms = 250\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let loaded = AppConfig::load(Some(path.clone())).unwrap();
        assert!(loaded.from_file);
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.quoter.window_ms, 250);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[quoter]"));
        assert!(toml_str.contains("log_level"));
    }
}
