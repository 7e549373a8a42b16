//! Colour and font descriptions for the head screen.
//!
//! Accepts the small CSS subset the configuration uses: `#rgb`, `#rrggbb`,
//! `rgb(r, g, b)`, `rgba(r, g, b, a)` and `"<N>px <family>"` fonts.
use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("unsupported colour {0:?}")]
    Colour(String),
    #[error("font {0:?} does not start with a pixel size such as \"32px\"")]
    Font(String),
}

/// Straight (non-premultiplied) 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over composite of `self` onto `dst`.
    pub fn over(self, dst: Rgba) -> Rgba {
        let sa = self.a as u32;
        if sa == 255 {
            return self;
        }
        if sa == 0 {
            return dst;
        }

        let da = dst.a as u32 * (255 - sa) / 255;
        let out_a = sa + da;
        let channel = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da + out_a / 2) / out_a) as u8;
        Rgba {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: out_a as u8,
        }
    }
}

impl FromStr for Rgba {
    type Err = StyleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let invalid = || StyleError::Colour(raw.to_string());

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = value.to_ascii_lowercase();
        let (args, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();

        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(invalid());
        }

        let channel = |part: &str| part.parse::<u8>().map_err(|_| invalid());
        let alpha = if with_alpha {
            let alpha: f32 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid());
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };

        Ok(Rgba::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |c: char| c.to_digit(16).map(|d| d as u8);
    let digits: Vec<u8> = hex.chars().map(nibble).collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Rgba::opaque(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Some(Rgba::opaque(
            r1 * 16 + r2,
            g1 * 16 + g2,
            b1 * 16 + b2,
        )),
        _ => None,
    }
}

/// Pixel size plus family name. The family is informational: glyphs always
/// come from the built-in bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub size_px: u32,
    pub family: String,
}

impl FontSpec {
    /// Line height used for vertical layout.
    pub fn line_height(&self) -> u32 {
        self.size_px
    }
}

impl FromStr for FontSpec {
    type Err = StyleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let invalid = || StyleError::Font(raw.to_string());

        let (size, family) = value.split_once("px").ok_or_else(invalid)?;
        let size_px: u32 = size.trim().parse().map_err(|_| invalid())?;
        if size_px == 0 {
            return Err(invalid());
        }

        Ok(Self {
            size_px,
            family: family.trim().trim_matches(|c| c == '"' || c == '\'').to_string(),
        })
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px \"{}\"", self.size_px, self.family)
    }
}

/// Everything `ScreenSurface::render` needs to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenStyle {
    /// Material opacity of the projected quad (0..=1).
    pub opacity: f32,
    pub background: Rgba,
    pub text_color: Rgba,
    pub font: FontSpec,
}

impl Default for ScreenStyle {
    fn default() -> Self {
        Self {
            opacity: 0.8,
            background: Rgba::new(0, 0, 0, 179),
            text_color: Rgba::opaque(0x00, 0xff, 0x9d),
            font: FontSpec {
                size_px: 32,
                family: "Courier New".to_string(),
            },
        }
    }
}
