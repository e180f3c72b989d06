//! Serializable configuration for the icon pipeline.
//!
//! [`IconConfig`] gathers every constant the renderer depends on (the size
//! list, the palette and the segment/light counts) so the pipeline can be
//! driven and tested without touching rendering code. The defaults reproduce
//! the stock "secure server" icon.
//!
//! # Example
//!
//! ```
//! use server_glyph::{Color, IconConfig};
//!
//! let config = IconConfig::from_json(r##"{ "sizes": [32, 16], "accent": "#ff8800" }"##).unwrap();
//! assert_eq!(config.sizes, vec![32, 16]);
//! assert_eq!(config.palette.accent, Color::rgb(0xff, 0x88, 0x00));
//! assert_eq!(config.segment_count, 3);
//! ```

use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::geometry::compute_layout;

/// Sizes packed into the icon container, largest first.
pub const DEFAULT_SIZES: [u32; 6] = [256, 128, 64, 48, 32, 16];

/// Number of rack segments the server body is split into.
pub const DEFAULT_SEGMENT_COUNT: u32 = 3;

/// Indicator lights drawn on each segment.
pub const DEFAULT_LIGHTS_PER_SEGMENT: u32 = 3;

/// HSL lightness removed from the accent to obtain the idle light shade.
const DIM_LIGHTNESS_DROP: f32 = 0.265;

// ============================================================================
// Color
// ============================================================================

/// A straight (non-premultiplied) RGBA color.
///
/// Serializes as a `#rrggbb` hex string when opaque and `#rrggbbaa` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn as_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Returns a copy with its HSL lightness reduced by `amount` (0.0-1.0).
    ///
    /// Alpha is preserved.
    pub fn darken(&self, amount: f32) -> Self {
        let rgb = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        let mut hsl: Hsl = rgb.into_color();
        hsl.lightness = (hsl.lightness - amount).max(0.0);
        let darkened: Srgb = hsl.into_color();
        Self::new(
            (darkened.red * 255.0).round() as u8,
            (darkened.green * 255.0).round() as u8,
            (darkened.blue * 255.0).round() as u8,
            self.a,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IconError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = IconError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Color {
    fn schema_name() -> String {
        "Color".to_owned()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

// ============================================================================
// Palette
// ============================================================================

/// The fixed set of colors shared by every rendered size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Palette {
    /// Dividers and keyhole; matches the application background.
    pub background: Color,

    /// Active light, lock body and shackle.
    pub accent: Color,

    /// Idle indicator lights.
    pub accent_dim: Color,

    /// Server body.
    pub secondary: Color,

    /// Drop shadow under the server body. Usually semi-transparent black.
    pub shadow: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(15, 20, 25),
            accent: Color::rgb(0, 217, 255),
            accent_dim: Color::rgb(0, 100, 120),
            secondary: Color::rgb(37, 43, 55),
            shadow: Color::new(0, 0, 0, 60),
        }
    }
}

impl Palette {
    /// Builds a palette from three theme colors, deriving the idle light
    /// shade from the accent and keeping the default shadow.
    pub fn from_theme(background: Color, accent: Color, secondary: Color) -> Self {
        Self {
            background,
            accent,
            accent_dim: accent.darken(DIM_LIGHTNESS_DROP),
            secondary,
            ..Self::default()
        }
    }
}

// ============================================================================
// IconConfig
// ============================================================================

/// Everything the pipeline needs besides the geometry formulas.
///
/// # JSON Format
///
/// ```json
/// {
///   "sizes": [256, 128, 64, 48, 32, 16],
///   "background": "#0f1419",
///   "accent": "#00d9ff",
///   "accentDim": "#006478",
///   "secondary": "#252b37",
///   "shadow": "#0000003c",
///   "segmentCount": 3,
///   "lightsPerSegment": 3
/// }
/// ```
///
/// Any omitted field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconConfig {
    /// Pixel sizes to render, in container order.
    pub sizes: Vec<u32>,

    #[serde(flatten)]
    pub palette: Palette,

    /// Horizontal segments in the server body.
    pub segment_count: u32,

    /// Indicator lights per segment.
    pub lights_per_segment: u32,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            palette: Palette::default(),
            segment_count: DEFAULT_SEGMENT_COUNT,
            lights_per_segment: DEFAULT_LIGHTS_PER_SEGMENT,
        }
    }
}

impl IconConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the size list.
    pub fn with_sizes(mut self, sizes: &[u32]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    /// Replaces the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Checks the configuration can drive a full pipeline run.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(IconError::EmptyIconSet);
        }
        if let Some(&size) = self.sizes.iter().find(|&&s| s == 0) {
            return Err(IconError::InvalidSize(size));
        }
        if self.segment_count == 0 {
            return Err(IconError::InvalidConfig("segmentCount must be at least 1".into()));
        }
        if self.lights_per_segment == 0 {
            return Err(IconError::InvalidConfig(
                "lightsPerSegment must be at least 1".into(),
            ));
        }

        // Counts are checked against the largest body; smaller sizes shrink
        // spacing and body together.
        let largest = self.sizes.iter().copied().max().unwrap_or_default();
        let layout = compute_layout(largest)?;
        let lights_width = u64::from(self.lights_per_segment) * layout.light_spacing as u64;
        if lights_width > layout.server.width as u64 {
            return Err(IconError::InvalidConfig(format!(
                "{} lights per segment do not fit a {}px wide body",
                self.lights_per_segment, layout.server.width
            )));
        }
        if u64::from(self.segment_count) > layout.server.height as u64 {
            return Err(IconError::InvalidConfig(format!(
                "{} segments do not fit a {}px tall body",
                self.segment_count, layout.server.height
            )));
        }
        Ok(())
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes and validates a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
