//! RGB colors as they appear in the exported graph and the palette the
//! exporter draws them from.
use std::collections::BTreeMap;
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::new(192, 192, 192);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Render as `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linearly interpolate between `low` and `high` according to the position
    /// of `value` in `[min, max]`. Values outside the interval are clamped to it.
    ///
    /// When the interval is empty every value maps to `high`.
    pub fn interpolate(value: f64, min: f64, max: f64, low: Color, high: Color) -> Color {
        let fraction = Self::interpolation_fraction(value, min, max);
        let channel = |a: u8, b: u8| -> u8 {
            let a = a as f64;
            let b = b as f64;
            (a + (b - a) * fraction).round().clamp(0.0, 255.0) as u8
        };
        Color::new(
            channel(low.r, high.r),
            channel(low.g, high.g),
            channel(low.b, high.b),
        )
    }

    /// The position of `value` within `[min, max]` as a fraction in `[0, 1]`
    pub fn interpolation_fraction(value: f64, min: f64, max: f64) -> f64 {
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return 1.0;
        }
        ((value - min) / span).clamp(0.0, 1.0)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Expected a color of the form #RRGGBB, got {0:?}")]
    InvalidLength(String),
    #[error("Invalid hexadecimal color component: {0}")]
    InvalidComponent(#[from] ParseIntError),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::InvalidLength(s.to_string()));
        }
        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Color::new(r, g, b))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

const TAXONOMY_PALETTE: [Color; 8] = [
    Color::new(255, 200, 0),
    Color::new(255, 175, 175),
    Color::new(178, 223, 138),
    Color::new(166, 206, 227),
    Color::new(202, 178, 214),
    Color::new(253, 191, 111),
    Color::new(255, 255, 153),
    Color::new(177, 89, 40),
];

/// The colors used for everything other than the ratio gradient's end points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ColorManager {
    /// Fill for peptide nodes that are not significantly regulated, when set
    pub non_regulated: Option<Color>,
    /// Outline and edge color marking inconsistent evidence
    pub highlight: Color,
    pub aligned_peptides_edge: Color,
    pub discarded_node_fill: Color,
    pub discarded_node_label: Color,
    /// Fill for protein nodes spanning more than one taxonomy, when set
    pub multi_taxonomy: Option<Color>,
    pub taxonomy_colors: BTreeMap<String, Color>,
    /// The fill of a node at the low end of the ratio range
    pub ratio_min: Color,
    /// The fill of a node at the high end of the ratio range
    pub ratio_max: Color,
    pub default_peptide_fill: Color,
    pub default_edge: Color,
}

impl Default for ColorManager {
    fn default() -> Self {
        Self {
            non_regulated: None,
            highlight: Color::RED,
            aligned_peptides_edge: Color::BLUE,
            discarded_node_fill: Color::LIGHT_GRAY,
            discarded_node_label: Color::GRAY,
            multi_taxonomy: None,
            taxonomy_colors: BTreeMap::new(),
            ratio_min: Color::GREEN,
            ratio_max: Color::RED,
            default_peptide_fill: Color::CYAN,
            default_edge: Color::BLACK,
        }
    }
}

impl ColorManager {
    pub fn with_non_regulated(mut self, color: Color) -> Self {
        self.non_regulated = Some(color);
        self
    }

    pub fn with_ratio_colors(mut self, low: Color, high: Color) -> Self {
        self.ratio_min = low;
        self.ratio_max = high;
        self
    }

    pub fn with_taxonomy_color<S: Into<String>>(mut self, taxonomy: S, color: Color) -> Self {
        self.taxonomy_colors.insert(taxonomy.into(), color);
        self
    }

    /// The color for a protein's taxonomy. Taxonomies without a configured
    /// color get a palette entry derived from their name, so the same
    /// taxonomy is painted alike in every exported graph.
    pub fn color_for_taxonomy(&self, taxonomy: &str) -> Color {
        if let Some(color) = self.taxonomy_colors.get(taxonomy) {
            return *color;
        }
        let hash = taxonomy
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        TAXONOMY_PALETTE[hash as usize % TAXONOMY_PALETTE.len()]
    }

    pub fn is_highlight(&self, color: Color) -> bool {
        color == self.highlight
    }
}
