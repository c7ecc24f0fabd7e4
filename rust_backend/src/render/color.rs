//! Colors and the continent/event color scheme.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::core::domain::EventType;

/// An sRGB color with straight alpha.
///
/// Parses the CSS forms used in configuration files: `#rgb`, `#rrggbb`,
/// `rgb(r, g, b)` and `rgba(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid color '{0}'")]
pub struct ColorParseError(pub String);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from HSL components (hue in degrees, saturation and
    /// lightness in percent).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hsl: Hsl = Hsl::new(
            hue as f32,
            (saturation / 100.0).clamp(0.0, 1.0) as f32,
            (lightness / 100.0).clamp(0.0, 1.0) as f32,
        );
        let rgb: Srgb = hsl.into_color();
        Self::from_srgb(rgb, 1.0)
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Shifts HSL lightness by `percent` points, keeping hue, saturation and alpha.
    pub fn adjust_lightness(self, percent: f64) -> Self {
        let mut hsl: Hsl = self.to_srgb().into_color();
        hsl.lightness = (hsl.lightness + (percent / 100.0) as f32).clamp(0.0, 1.0);
        let rgb: Srgb = hsl.into_color();
        Self::from_srgb(rgb, self.a)
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, round_alpha(self.a))
        }
    }

    /// Hex form without alpha, for formats that carry opacity separately.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_srgb(self) -> Srgb {
        Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    fn from_srgb(rgb: Srgb, alpha: f64) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: channel(rgb.red),
            g: channel(rgb.green),
            b: channel(rgb.blue),
            a: alpha,
        }
    }
}

fn round_alpha(a: f64) -> f64 {
    (a * 1000.0).round() / 1000.0
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || ColorParseError(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(err)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Color::rgb(r * 17, g * 17, b * 17)),
                [r1, r2, g1, g2, b1, b2] => {
                    Ok(Color::rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2))
                }
                _ => Err(err()),
            };
        }

        let lower = text.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;

        let parts: Vec<f64> = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| err())?;

        let channel = |v: f64| -> Result<u8, ColorParseError> {
            if (0.0..=255.0).contains(&v) {
                Ok(v.round() as u8)
            } else {
                Err(err())
            }
        };

        match parts.as_slice() {
            [r, g, b] => Ok(Color::rgb(channel(*r)?, channel(*g)?, channel(*b)?)),
            [r, g, b, a] if (0.0..=1.0).contains(a) => {
                Ok(Color::rgba(channel(*r)?, channel(*g)?, channel(*b)?, *a))
            }
            _ => Err(err()),
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

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Supplies the colors the engine does not decide on its own.
pub trait ColorScheme: Send + Sync {
    /// Base color for all bars of a continent.
    fn continent_color(&self, continent: &str) -> Color;
}

/// Color table for continents, with a hashed fallback for unknown names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinentPalette {
    colors: BTreeMap<String, Color>,
}

impl ContinentPalette {
    pub fn new(colors: BTreeMap<String, Color>) -> Self {
        Self { colors }
    }

    /// Named entries, sorted by continent.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(name, color)| (name.as_str(), *color))
    }

    /// Golden-angle hue picked from the sum of the name's code points.
    pub fn fallback_color(continent: &str) -> Color {
        let hash: u64 = continent.chars().map(|c| c as u64).sum();
        let hue = (hash as f64 * 137.508) % 360.0;
        Color::from_hsl(hue, 60.0, 50.0)
    }
}

impl Default for ContinentPalette {
    fn default() -> Self {
        let colors = [
            ("África", Color::rgb(0xa0, 0x5a, 0x2c)),
            ("Asia", Color::rgb(0xb8, 0x86, 0x0b)),
            ("Europa", Color::rgb(0x5f, 0x7c, 0x8a)),
            ("América del Norte", Color::rgb(0xc0, 0x40, 0x40)),
            ("América del Sur", Color::rgb(0x8a, 0x6a, 0x9a)),
            ("Oceanía", Color::rgb(0x60, 0x99, 0x66)),
            ("Desconocido", Color::rgb(0xaa, 0xaa, 0xaa)),
            ("Unknown", Color::rgb(0xaa, 0xaa, 0xaa)),
        ];
        Self {
            colors: colors
                .into_iter()
                .map(|(name, color)| (name.to_string(), color))
                .collect(),
        }
    }
}

impl ColorScheme for ContinentPalette {
    fn continent_color(&self, continent: &str) -> Color {
        if continent.is_empty() {
            return Color::rgb(0x9a, 0x8d, 0x7e);
        }
        self.colors
            .get(continent)
            .copied()
            .unwrap_or_else(|| Self::fallback_color(continent))
    }
}

/// Marker colors per event type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPalette {
    pub writing: Color,
    pub metal: Color,
    pub architecture: Color,
    pub state: Color,
    pub default: Color,
}

impl EventPalette {
    pub fn color_for(&self, kind: EventType) -> Color {
        match kind {
            EventType::Writing => self.writing,
            EventType::Metal => self.metal,
            EventType::Architecture => self.architecture,
            EventType::State => self.state,
        }
    }
}

impl Default for EventPalette {
    fn default() -> Self {
        Self {
            writing: Color::rgb(0x6a, 0x98, 0xb9),
            metal: Color::rgb(0xd9, 0xa0, 0x5b),
            architecture: Color::rgb(0x60, 0x99, 0x66),
            state: Color::rgb(0x8a, 0x6a, 0x9a),
            default: Color::rgb(0x9a, 0x8d, 0x7e),
        }
    }
}

/// One row of a legend a host UI can display next to a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Continent swatches followed by event marker colors.
pub fn legend_entries(
    continents: &ContinentPalette,
    events: &EventPalette,
) -> (Vec<LegendEntry>, Vec<LegendEntry>) {
    let continent_rows = continents
        .entries()
        .map(|(name, color)| LegendEntry {
            label: name.to_string(),
            color,
        })
        .collect();
    let event_rows = EventType::ALL
        .iter()
        .map(|kind| LegendEntry {
            label: capitalize(kind.as_str()),
            color: events.color_for(*kind),
        })
        .collect();
    (continent_rows, event_rows)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
