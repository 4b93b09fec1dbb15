//! CLI configuration management.
//!
//! Supports loading configuration from a config file, environment variables,
//! and CLI arguments with proper precedence (flag > env > file > default).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use graph_walk_core::{Algorithm, Preset};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fastest pacing the animation accepts (0 disables pacing entirely).
pub const MIN_DELAY_MS: u64 = 100;
/// Slowest pacing the animation accepts.
pub const MAX_DELAY_MS: u64 = 1000;
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pause between animation steps, in milliseconds.
    pub delay_ms: u64,

    /// Graph preset to traverse.
    pub graph: Preset,

    /// Algorithm used when none is given on the command line.
    pub algorithm: Algorithm,

    /// Start node.
    pub start: usize,

    /// Print the full pseudocode listing on every step.
    pub show_pseudocode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            graph: Preset::Small,
            algorithm: Algorithm::Dfs,
            start: 0,
            show_pseudocode: false,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        // File config takes lower precedence than env vars
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                config = serde_json::from_str(&contents)
                    .with_context(|| "Failed to parse config file")?;
            }
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply `GW_*` overrides from `var`. Invalid values are logged and ignored.
    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("GW_DELAY_MS") {
            match value.parse::<u64>() {
                Ok(ms) => self.delay_ms = ms,
                Err(_) => warn!(value = %value, "ignoring invalid GW_DELAY_MS"),
            }
        }
        if let Some(value) = var("GW_GRAPH") {
            match value.parse::<Preset>() {
                Ok(preset) => self.graph = preset,
                Err(e) => warn!(error = %e, "ignoring invalid GW_GRAPH"),
            }
        }
        if let Some(value) = var("GW_ALGORITHM") {
            match value.parse::<Algorithm>() {
                Ok(algorithm) => self.algorithm = algorithm,
                Err(e) => warn!(error = %e, "ignoring invalid GW_ALGORITHM"),
            }
        }
        if let Some(value) = var("GW_START") {
            match value.parse::<usize>() {
                Ok(start) => self.start = start,
                Err(_) => warn!(value = %value, "ignoring invalid GW_START"),
            }
        }
        if let Some(value) = var("GW_PSEUDOCODE") {
            match parse_flag(&value) {
                Some(show) => self.show_pseudocode = show,
                None => warn!(value = %value, "ignoring invalid GW_PSEUDOCODE"),
            }
        }
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file. `GW_CONFIG_DIR` overrides the platform directory.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("GW_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "graph-walk", "gw")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Pacing delay after clamping into the accepted range.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(clamp_delay_ms(self.delay_ms))
    }
}

/// Parse an on/off environment value, case-insensitively.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Clamp into `MIN_DELAY_MS..=MAX_DELAY_MS`, keeping 0 as "no pacing".
pub fn clamp_delay_ms(ms: u64) -> u64 {
    if ms == 0 {
        return 0;
    }
    let clamped = ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
    if clamped != ms {
        warn!(requested = ms, used = clamped, "delay outside accepted range");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delay() {
        assert_eq!(clamp_delay_ms(0), 0);
        assert_eq!(clamp_delay_ms(20), MIN_DELAY_MS);
        assert_eq!(clamp_delay_ms(250), 250);
        assert_eq!(clamp_delay_ms(5_000), MAX_DELAY_MS);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "graph": "tree", "start": 3 }"#).unwrap();
        assert_eq!(config.graph, Preset::Tree);
        assert_eq!(config.start, 3);
        assert_eq!(config.delay_ms, DEFAULT_DELAY_MS);
        assert_eq!(config.algorithm, Algorithm::Dfs);
    }

    #[test]
    fn test_env_overrides_and_invalid_values() {
        let file = Config {
            show_pseudocode: true,
            delay_ms: 300,
            ..Default::default()
        };
        fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
            move |key: &str| {
                pairs
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.to_string())
            }
        }

        let mut config = file.clone();
        config.apply_vars(vars(&[("GW_PSEUDOCODE", "TRUE"), ("GW_DELAY_MS", "0")]));
        assert!(config.show_pseudocode);
        assert_eq!(config.delay_ms, 0);

        let mut config = file.clone();
        config.apply_vars(vars(&[
            ("GW_PSEUDOCODE", "sometimes"),
            ("GW_DELAY_MS", "fast"),
            ("GW_GRAPH", "grid"),
        ]));
        assert_eq!(config, file);

        let mut config = file.clone();
        config.apply_vars(vars(&[("GW_PSEUDOCODE", "off"), ("GW_ALGORITHM", "bfs")]));
        assert!(!config.show_pseudocode);
        assert_eq!(config.algorithm, Algorithm::Bfs);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("False"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(Config::default().delay(), Duration::from_millis(500));
    }
}
