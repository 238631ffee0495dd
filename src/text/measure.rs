//! Approximate text width models.

use unicode_width::UnicodeWidthStr;

use super::CHAR_WIDTH_FACTOR;

/// Estimates the rendered width of a string at a given font size.
///
/// Implementations must be pure: the same text and size always produce the
/// same width, and width grows linearly with `font_size`.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

/// Proportional-font approximation: every character is `0.6 * font_size` wide.
///
/// This is the model the fitting engine was tuned against. It ignores the
/// font family entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalMeasurer {
    pub char_width_factor: f64,
}

impl Default for ProportionalMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: CHAR_WIDTH_FACTOR,
        }
    }
}

impl TextMeasurer for ProportionalMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_factor
    }
}

/// Same formula as [`ProportionalMeasurer`], but counts display columns
/// instead of characters so double-width glyphs take two slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayWidthMeasurer {
    pub char_width_factor: f64,
}

impl Default for DisplayWidthMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: CHAR_WIDTH_FACTOR,
        }
    }
}

impl TextMeasurer for DisplayWidthMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.width() as f64 * font_size * self.char_width_factor
    }
}

/// Measurement backend selectable from the command line.
#[derive(clap::ValueEnum, serde::Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// One slot per character
    #[default]
    Chars,
    /// One slot per display column (wide glyphs count twice)
    DisplayWidth,
}

impl MeasureMode {
    pub fn measurer(self) -> Box<dyn TextMeasurer> {
        match self {
            Self::Chars => Box::new(ProportionalMeasurer::default()),
            Self::DisplayWidth => Box::new(DisplayWidthMeasurer::default()),
        }
    }
}

/// Width of `text` at `font_size` under the default proportional model.
pub fn measure_width(text: &str, font_size: f64) -> f64 {
    ProportionalMeasurer::default().measure(text, font_size)
}
