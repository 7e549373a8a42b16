//! Head screen settings loaded from `config/head_screen.toml`.
use std::{f32::consts::PI, fs};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::config_path;

use super::style::{FontSpec, Rgba, ScreenStyle};
use super::surface::MAX_SURFACE_SIDE;

const CONFIG_FILE: &str = "head_screen.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawHeadScreenConfig {
    #[serde(default)]
    screen: RawScreen,
    #[serde(default)]
    dimensions: RawDimensions,
    #[serde(default)]
    resolution: RawResolution,
    #[serde(default)]
    style: RawStyle,
    #[serde(default)]
    position: RawPosition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawScreen {
    enabled: bool,
}

impl Default for RawScreen {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDimensions {
    width: f32,
    height: f32,
}

impl Default for RawDimensions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawResolution {
    width: u32,
    height: u32,
}

impl Default for RawResolution {
    fn default() -> Self {
        Self {
            width: 512,
            height: 156,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawStyle {
    opacity: f32,
    background: String,
    text_color: String,
    font: String,
}

impl Default for RawStyle {
    fn default() -> Self {
        Self {
            opacity: 0.8,
            background: "rgba(0, 0, 0, 0.7)".to_string(),
            text_color: "#00ff9d".to_string(),
            font: "32px \"Courier New\"".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPosition {
    y: f32,
    rotation: f32,
}

impl Default for RawPosition {
    fn default() -> Self {
        Self { y: 2.0, rotation: PI }
    }
}

/// Runtime configuration derived from `config/head_screen.toml`.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HeadScreenSettings {
    pub enabled: bool,
    /// Quad size in world units.
    pub dimensions: Vec2,
    /// Bitmap size in pixels.
    pub resolution: UVec2,
    pub style: ScreenStyle,
    /// Height above the avatar origin, world units.
    pub offset_y: f32,
    /// Yaw relative to the avatar, radians.
    pub rotation: f32,
}

impl HeadScreenSettings {
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
        toml::from_str::<RawHeadScreenConfig>(raw).map(Self::from)
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for HeadScreenSettings {
    fn default() -> Self {
        RawHeadScreenConfig::default().into()
    }
}

impl From<RawHeadScreenConfig> for HeadScreenSettings {
    fn from(value: RawHeadScreenConfig) -> Self {
        let fallback = ScreenStyle::default();
        let raw_style = value.style;

        let background = raw_style.background.parse::<Rgba>().unwrap_or_else(|err| {
            warn!("{}; using default background", err);
            fallback.background
        });
        let text_color = raw_style.text_color.parse::<Rgba>().unwrap_or_else(|err| {
            warn!("{}; using default text colour", err);
            fallback.text_color
        });
        let resolution = UVec2::new(
            value.resolution.width.clamp(1, MAX_SURFACE_SIDE),
            value.resolution.height.clamp(1, MAX_SURFACE_SIDE),
        );
        let mut font = raw_style.font.parse::<FontSpec>().unwrap_or_else(|err| {
            warn!("{}; using default font", err);
            fallback.font.clone()
        });
        if font.size_px > resolution.y {
            warn!(
                "Font size {}px exceeds the {}px screen height; clamping",
                font.size_px, resolution.y
            );
            font.size_px = resolution.y;
        }
        let opacity = if raw_style.opacity.is_finite() {
            raw_style.opacity.clamp(0.0, 1.0)
        } else {
            fallback.opacity
        };

        Self {
            enabled: value.screen.enabled,
            dimensions: Vec2::new(
                value.dimensions.width.max(f32::EPSILON),
                value.dimensions.height.max(f32::EPSILON),
            ),
            resolution,
            style: ScreenStyle {
                opacity,
                background,
                text_color,
                font,
            },
            offset_y: value.position.y,
            rotation: value.position.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let settings = HeadScreenSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.dimensions, Vec2::new(1.0, 0.3));
        assert_eq!(settings.resolution, UVec2::new(512, 156));
        assert_eq!(settings.style, ScreenStyle::default());
        assert_eq!(settings.offset_y, 2.0);
        assert_eq!(settings.rotation, PI);
    }

    #[test]
    fn invalid_style_values_fall_back() {
        let settings = HeadScreenSettings::from_toml(
            r##"
            [style]
            opacity = 3.5
            background = "chartreuse"
            text_color = "#fff"
            font = "huge"

            [resolution]
            width = 0
            "##,
        )
        .expect("valid toml");

        assert_eq!(settings.style.opacity, 1.0);
        assert_eq!(settings.style.background, ScreenStyle::default().background);
        assert_eq!(settings.style.text_color, Rgba::opaque(255, 255, 255));
        assert_eq!(settings.style.font, ScreenStyle::default().font);
        assert_eq!(settings.resolution, UVec2::new(1, 156));
    }

    #[test]
    fn resolution_and_font_size_are_bounded() {
        let settings = HeadScreenSettings::from_toml(
            r##"
            [style]
            font = "1000px mono"

            [resolution]
            width = 100000
            height = 120
            "##,
        )
        .expect("valid toml");

        assert_eq!(settings.resolution, UVec2::new(MAX_SURFACE_SIDE, 120));
        assert_eq!(settings.style.font.size_px, 120);
        assert_eq!(settings.style.font.family, "mono");
    }

    #[test]
    fn can_be_disabled_from_file() {
        let settings = HeadScreenSettings::from_toml("[screen]\nenabled = false").expect("valid");
        assert!(!settings.enabled);
        assert_eq!(settings, HeadScreenSettings::disabled());
    }

    #[test]
    fn shipped_file_matches_defaults() {
        let shipped = HeadScreenSettings::from_toml(include_str!("../../config/head_screen.toml"))
            .expect("shipped config parses");
        assert_eq!(shipped, HeadScreenSettings::default());
    }
}
