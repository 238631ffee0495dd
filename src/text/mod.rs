//! Text measurement model.
//!
//! Widths are estimated, not shaped: a string is `chars * font_size * 0.6`
//! wide. Everything the fitting engine decides rests on this model, so the
//! constants below are shared with the solver and the SVG writer.

mod measure;
mod wrap;

pub use measure::{
    DisplayWidthMeasurer, MeasureMode, ProportionalMeasurer, TextMeasurer, measure_width,
};
pub use wrap::{WrapResult, block_height, fits_with_wrap, fits_with_wrap_with, wrap, wrap_with};

/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Space between two words as a fraction of the font size.
pub const WORD_GAP_FACTOR: f64 = 0.3;

/// Baseline-to-baseline distance as a fraction of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Share of the node diameter text may occupy.
pub const SAFETY_MARGIN: f64 = 0.95;
