//! Phone settings loaded from `config/phone.toml`.
use std::fs;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::config_path;

const CONFIG_FILE: &str = "phone.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawPhoneConfig {
    #[serde(default)]
    phone: RawPhone,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPhone {
    keyboard_shortcuts: bool,
}

impl Default for RawPhone {
    fn default() -> Self {
        Self {
            keyboard_shortcuts: true,
        }
    }
}

/// Runtime configuration derived from `config/phone.toml`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PhoneSettings {
    /// `Alt+H` toggles and `Escape` closes. Off on touch-only setups.
    pub keyboard_shortcuts: bool,
}

impl PhoneSettings {
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
        toml::from_str::<RawPhoneConfig>(raw).map(Self::from)
    }
}

impl Default for PhoneSettings {
    fn default() -> Self {
        RawPhoneConfig::default().into()
    }
}

impl From<RawPhoneConfig> for PhoneSettings {
    fn from(value: RawPhoneConfig) -> Self {
        Self {
            keyboard_shortcuts: value.phone.keyboard_shortcuts,
        }
    }
}
