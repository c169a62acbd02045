use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// RGBA color with `0..=1` components.
///
/// Serialized as a CSS color string, so chart configuration can be written
/// the same way a page stylesheet would write it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ColorParseError {
    #[error("unsupported color syntax `{0}`")]
    Syntax(String),
    #[error("invalid color component `{0}`")]
    Component(String),
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Build a color from 4 0..255 components
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color::new(
            r as f32 / 255.,
            g as f32 / 255.,
            b as f32 / 255.,
            a as f32 / 255.,
        )
    }

    /// Build a color from a hexadecimal u32
    /// Example: 0x49C6E6 - the default series blue
    pub fn from_hex(hex: u32) -> Color {
        let bytes: [u8; 4] = hex.to_be_bytes();

        Self::from_rgba(bytes[1], bytes[2], bytes[3], 255)
    }

    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }

    /// Format as a CSS `rgba(...)` string for canvas fill/stroke styles.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    fn channel(v: f32) -> u8 {
        (v.clamp(0., 1.) * 255.).round() as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            Self::channel(self.r),
            Self::channel(self.g),
            Self::channel(self.b),
            self.a.clamp(0., 1.)
        )
    }
}

fn parse_channel(s: &str) -> Result<u8, ColorParseError> {
    s.trim()
        .parse::<u8>()
        .map_err(|_| ColorParseError::Component(s.trim().to_owned()))
}

fn parse_alpha(s: &str) -> Result<f32, ColorParseError> {
    let s = s.trim();
    match s.parse::<f32>() {
        Ok(a) if (0. ..=1.).contains(&a) => Ok(a),
        _ => Err(ColorParseError::Component(s.to_owned())),
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16)
                .map_err(|_| ColorParseError::Component(hex.to_owned()))?;
            return match hex.len() {
                6 => Ok(Color::from_hex(value)),
                8 => {
                    let [r, g, b, a] = value.to_be_bytes();
                    Ok(Color::from_rgba(r, g, b, a))
                }
                _ => Err(ColorParseError::Syntax(s.to_owned())),
            };
        }

        let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(ColorParseError::Syntax(s.to_owned()));
        };
        let args = args
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::Syntax(s.to_owned()))?;

        let parts: Vec<&str> = args.split(',').collect();
        match (parts.as_slice(), has_alpha) {
            ([r, g, b], false) => Ok(Color::from_rgba(
                parse_channel(r)?,
                parse_channel(g)?,
                parse_channel(b)?,
                255,
            )),
            ([r, g, b, a], true) => Ok(
                Color::from_rgba(parse_channel(r)?, parse_channel(g)?, parse_channel(b)?, 255)
                    .with_alpha(parse_alpha(a)?),
            ),
            _ => Err(ColorParseError::Syntax(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

pub mod colors {
    //! Constants for the colors the chart surface draws with.
    use super::Color;

    pub const LIGHTGRAY: Color = Color::new(0.90, 0.90, 0.90, 1.00);
    pub const GRAY: Color = Color::new(0.51, 0.51, 0.51, 1.00);
    pub const DARKGRAY: Color = Color::new(0.31, 0.31, 0.31, 1.00);
    pub const SERIES: Color = Color::new(73. / 255., 198. / 255., 230. / 255., 0.50);
    pub const WHITE: Color = Color::new(1.00, 1.00, 1.00, 1.00);
    pub const BLACK: Color = Color::new(0.00, 0.00, 0.00, 1.00);
}
