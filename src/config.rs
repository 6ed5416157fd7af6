//! Engine tuning that a deployment may want to change without a rebuild.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub offline: OfflineConfig,
    #[serde(default)]
    pub save: SaveConfig,
    #[serde(default)]
    pub prestige: PrestigeConfig,
}

/// Offline catch-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Fraction of the normal automatic rate paid while away.
    pub efficiency: f64,
    /// Longest absence that is paid out.
    pub max_duration_secs: f64,
    /// Shorter absences pay nothing.
    pub min_elapsed_secs: f64,
    /// Share of offline yield sold on tiers whose auto-seller is running.
    pub auto_sell_fraction: f64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            efficiency: 0.1,
            max_duration_secs: 24.0 * 60.0 * 60.0,
            min_elapsed_secs: 60.0,
            auto_sell_fraction: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub storage_key: String,
    /// Throw away saves written by a different format version.
    pub reset_on_version_change: bool,
    /// Save requests closer together than this are written once.
    pub debounce_secs: f64,
    pub autosave_interval_secs: f64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            storage_key: "ore_idle_save".into(),
            reset_on_version_change: false,
            debounce_secs: 2.0,
            autosave_interval_secs: 30.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeConfig {
    /// Prestige is refused below this many shards.
    pub min_reward: u64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self { min_reward: 1 }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse a TOML file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn try_load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Like [`EngineConfig::try_load`], falling back to defaults when the
    /// file is missing or malformed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) => {
                log::info!("no config at {}: {e}. Using defaults.", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}. Using defaults.");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!((config.offline.efficiency - 0.1).abs() < f64::EPSILON);
        assert!((config.offline.max_duration_secs - 86_400.0).abs() < f64::EPSILON);
        assert!((config.offline.min_elapsed_secs - 60.0).abs() < f64::EPSILON);
        assert!(!config.save.reset_on_version_change);
        assert_eq!(config.save.storage_key, "ore_idle_save");
        assert_eq!(config.prestige.min_reward, 1);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = EngineConfig::default();
        let serialized = toml::to_string_pretty(&config).expect("serialize");
        let deserialized = EngineConfig::from_toml_str(&serialized).expect("deserialize");
        assert_eq!(deserialized, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [offline]
            max_duration_secs = 10800.0

            [save]
            reset_on_version_change = true
            "#,
        )
        .unwrap();
        assert!((config.offline.max_duration_secs - 10_800.0).abs() < f64::EPSILON);
        assert!((config.offline.efficiency - 0.1).abs() < f64::EPSILON);
        assert!(config.save.reset_on_version_change);
        assert!((config.save.debounce_secs - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.prestige.min_reward, 1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let result = EngineConfig::from_toml_str("offline = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn try_load_missing_file_is_io_error() {
        let result = EngineConfig::try_load(std::path::Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = EngineConfig::load(std::path::Path::new("/definitely/not/here.toml"));
        assert_eq!(config, EngineConfig::default());
    }
}
