use crate::text::{
    MeasureMode, ProportionalMeasurer, TextMeasurer, fits_with_wrap_with, wrap_with,
};

use super::{FitConstraints, FitResult, NodeLabel};

/// Resolution of the font size search.
pub const SEARCH_STEP: f64 = 0.5;

/// Upper bound on grid steps above the minimum, so huge ranges stay finite.
const MAX_SEARCH_STEPS: f64 = 65_535.0;

/// Trim a label and uppercase its first character.
///
/// Applied once, before any measuring, and the normalized string is what
/// ends up in the document.
pub fn normalize_label(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Solve one label with the default proportional measurer.
pub fn solve(text: &str, diameter: f64, constraints: FitConstraints) -> FitResult {
    FontFitter::default().solve(text, diameter, constraints)
}

fn usable_diameter(diameter: f64) -> bool {
    diameter.is_finite() && diameter > 0.0
}

/// Font-fit solver bound to one measurement model.
pub struct FontFitter {
    measurer: Box<dyn TextMeasurer>,
}

impl Default for FontFitter {
    fn default() -> Self {
        Self::new(Box::new(ProportionalMeasurer::default()))
    }
}

impl std::fmt::Debug for FontFitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFitter").finish_non_exhaustive()
    }
}

impl FontFitter {
    pub fn new(measurer: Box<dyn TextMeasurer>) -> Self {
        Self { measurer }
    }

    pub fn for_mode(mode: MeasureMode) -> Self {
        Self::new(mode.measurer())
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Largest grid size in `constraints` at which `text` fits `diameter`.
    ///
    /// Falls back to the minimum size when nothing fits. A zero diameter
    /// cannot hold anything, so the text comes back as one unwrapped line.
    pub fn solve(&self, text: &str, diameter: f64, constraints: FitConstraints) -> FitResult {
        let FitConstraints {
            min_font_size: min,
            max_font_size: max,
        } = constraints;
        let usable = usable_diameter(diameter);

        let steps = if usable && max >= min {
            ((max - min) / SEARCH_STEP).floor().min(MAX_SEARCH_STEPS) as i64
        } else {
            -1
        };

        let mut low = 0_i64;
        let mut high = steps;
        let mut best = None;
        while low <= high {
            let mid = low + (high - low) / 2;
            let size = (min + mid as f64 * SEARCH_STEP).min(max);
            if fits_with_wrap_with(self.measurer(), text, size, diameter).fits {
                best = Some(size);
                low = mid + 1;
            } else {
                high = mid - 1;
            }
        }

        let font_size = best.unwrap_or(min);
        FitResult {
            font_size,
            lines: self.lines_at(text, font_size, diameter),
        }
    }

    /// Fit a diagram label, or `None` when it has no visible text.
    ///
    /// When the label already wraps at its current size, each wrapped line
    /// is solved on its own and the smallest result wins for the whole label.
    pub fn fit_label(&self, label: &NodeLabel, constraints: FitConstraints) -> Option<FitResult> {
        let text = normalize_label(&label.text);
        if text.is_empty() {
            return None;
        }

        let initial = wrap_with(self.measurer(), &text, label.font_size, label.diameter);
        let font_size = if initial.len() > 1 {
            initial
                .iter()
                .map(|line| self.solve(line, label.diameter, constraints).font_size)
                .fold(f64::INFINITY, f64::min)
        } else {
            self.solve(&text, label.diameter, constraints).font_size
        };

        Some(FitResult {
            font_size,
            lines: self.lines_at(&text, font_size, label.diameter),
        })
    }

    /// Wrap a label at its current size without resizing it.
    pub fn wrap_label(&self, label: &NodeLabel) -> Option<FitResult> {
        let text = normalize_label(&label.text);
        if text.is_empty() {
            return None;
        }
        Some(FitResult {
            font_size: label.font_size,
            lines: wrap_with(self.measurer(), &text, label.font_size, label.diameter),
        })
    }

    /// Size the text of the largest node can sustain.
    ///
    /// Ties on diameter go to the label that comes first. Labels without
    /// visible text are not candidates.
    pub fn smart_ceiling(&self, labels: &[NodeLabel], constraints: FitConstraints) -> Option<f64> {
        let mut largest: Option<(&NodeLabel, String)> = None;
        for label in labels {
            let text = normalize_label(&label.text);
            if text.is_empty() {
                continue;
            }
            if largest
                .as_ref()
                .is_none_or(|(best, _)| label.diameter > best.diameter)
            {
                largest = Some((label, text));
            }
        }

        let (label, text) = largest?;
        Some(self.solve(&text, label.diameter, constraints).font_size)
    }

    fn lines_at(&self, text: &str, font_size: f64, diameter: f64) -> Vec<String> {
        if usable_diameter(diameter) {
            wrap_with(self.measurer(), text, font_size, diameter)
        } else {
            vec![text.to_string()]
        }
    }
}
