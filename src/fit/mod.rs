//! Font-fit solver.
//!
//! Picks, for each node label, the largest font size at which the wrapped
//! label stays inside the node's circle. The search runs over a 0.5pt grid
//! anchored at the minimum size, so results are reproducible and every
//! reported size is tight: the next grid step up does not fit.

mod pass;
mod solver;

use serde::Serialize;

pub use pass::FitPass;
pub use solver::{FontFitter, SEARCH_STEP, normalize_label, solve};

/// Default lower bound for fitted font sizes.
pub const DEFAULT_MIN_FONT_SIZE: f64 = 4.0;

/// Default upper bound for fitted font sizes.
pub const DEFAULT_MAX_FONT_SIZE: f64 = 100.0;

/// One visible node label, as read from the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabel {
    /// Identifier pairing the label with its node circle
    pub node_id: String,
    /// Raw label text
    pub text: String,
    /// Diameter of the node circle the text must fit in
    pub diameter: f64,
    /// Font size currently set on the label
    pub font_size: f64,
}

/// Inclusive font size range the solver may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitConstraints {
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for FitConstraints {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
        }
    }
}

impl FitConstraints {
    pub const fn new(min_font_size: f64, max_font_size: f64) -> Self {
        Self {
            min_font_size,
            max_font_size,
        }
    }

    /// Narrow the maximum to `ceiling`, never below the minimum.
    #[must_use]
    pub fn with_ceiling(self, ceiling: f64) -> Self {
        Self {
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size.min(ceiling).max(self.min_font_size),
        }
    }
}

/// Chosen font size and line breaks for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub font_size: f64,
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constraints() {
        let constraints = FitConstraints::default();
        assert_eq!(constraints, FitConstraints::new(4.0, 100.0));
    }

    #[test]
    fn test_with_ceiling_lowers_max() {
        let narrowed = FitConstraints::default().with_ceiling(31.5);
        assert_eq!(narrowed, FitConstraints::new(4.0, 31.5));
    }

    #[test]
    fn test_with_ceiling_never_raises_max() {
        let narrowed = FitConstraints::new(4.0, 20.0).with_ceiling(80.0);
        assert_eq!(narrowed.max_font_size, 20.0);
    }

    #[test]
    fn test_with_ceiling_never_drops_below_min() {
        let narrowed = FitConstraints::new(6.0, 20.0).with_ceiling(2.0);
        assert_eq!(narrowed, FitConstraints::new(6.0, 6.0));
    }
}
