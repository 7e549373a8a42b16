//! Idle trigger settings loaded from `config/idle.toml`.
use std::{fs, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::config_path;

use super::catalog::{AnimationCatalog, DEFAULT_ANIMATIONS};

const CONFIG_FILE: &str = "idle.toml";
const MIN_DELAY_MS: u64 = 1;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawIdleConfig {
    #[serde(default)]
    trigger: RawTrigger,
    #[serde(default)]
    catalog: RawCatalog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTrigger {
    enabled: bool,
    delay_ms: u64,
    seed: Option<u64>,
}

impl Default for RawTrigger {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 5_000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCatalog {
    animations: Vec<String>,
}

impl Default for RawCatalog {
    fn default() -> Self {
        Self {
            animations: DEFAULT_ANIMATIONS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Runtime configuration derived from `config/idle.toml`.
#[derive(Resource, Debug, Clone)]
pub struct IdleSettings {
    pub enabled: bool,
    pub delay: Duration,
    pub catalog: AnimationCatalog,
    /// Fixed RNG seed for reproducible picks; entropy when absent.
    pub seed: Option<u64>,
}

impl IdleSettings {
    pub fn load_or_default() -> Self {
        let path = config_path(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml(&raw).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawIdleConfig>(raw).map(Self::from)
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for IdleSettings {
    fn default() -> Self {
        RawIdleConfig::default().into()
    }
}

impl From<RawIdleConfig> for IdleSettings {
    fn from(value: RawIdleConfig) -> Self {
        Self {
            enabled: value.trigger.enabled,
            delay: Duration::from_millis(value.trigger.delay_ms.max(MIN_DELAY_MS)),
            catalog: AnimationCatalog::new(&value.catalog.animations),
            seed: value.trigger.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let settings = IdleSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.delay, Duration::from_millis(5_000));
        assert_eq!(settings.catalog.len(), 5);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn parses_partial_file() {
        let settings = IdleSettings::from_toml(
            r#"
            [trigger]
            delay_ms = 0
            seed = 3

            [catalog]
            animations = ["idle_wave"]
            "#,
        )
        .expect("valid toml");

        assert!(settings.enabled);
        assert_eq!(settings.delay, Duration::from_millis(MIN_DELAY_MS));
        assert_eq!(settings.seed, Some(3));
        assert_eq!(settings.catalog.len(), 1);
    }

    #[test]
    fn rejects_malformed_file() {
        assert!(IdleSettings::from_toml("[trigger]\nenabled = \"sometimes\"").is_err());
    }

    #[test]
    fn shipped_file_matches_defaults() {
        let shipped = IdleSettings::from_toml(include_str!("../../config/idle.toml"))
            .expect("shipped config parses");
        let defaults = IdleSettings::default();
        assert_eq!(shipped.enabled, defaults.enabled);
        assert_eq!(shipped.delay, defaults.delay);
        assert_eq!(shipped.catalog, defaults.catalog);
    }
}
