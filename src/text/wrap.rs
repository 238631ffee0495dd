//! Greedy word wrapping and the fit check built on top of it.

use super::measure::{ProportionalMeasurer, TextMeasurer};
use super::{LINE_HEIGHT_FACTOR, SAFETY_MARGIN, WORD_GAP_FACTOR};

/// Lines produced by wrapping a label, and whether they fit their circle.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapResult {
    /// Wrapped lines in reading order (never empty)
    pub lines: Vec<String>,
    /// True when every line and the whole block fit the safety margin
    pub fits: bool,
}

/// Wrap `text` so each line is at most `max_line_width` wide where possible.
///
/// Text that already fits is returned untouched as a single line. Otherwise
/// words are packed left to right; a word never gets split, so a word wider
/// than the limit occupies a line of its own.
pub fn wrap_with(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f64,
    max_line_width: f64,
) -> Vec<String> {
    if measurer.measure(text, font_size) <= max_line_width {
        return vec![text.to_string()];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![text.to_string()];
    }

    let gap = font_size * WORD_GAP_FACTOR;
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_width = 0.0;

    for word in words {
        let word_width = measurer.measure(word, font_size);
        if !current.is_empty() && current_width + gap + word_width > max_line_width {
            lines.push(current.join(" "));
            current.clear();
            current.push(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current_width += gap;
            }
            current.push(word);
            current_width += word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// [`wrap_with`] using the default proportional model.
pub fn wrap(text: &str, font_size: f64, max_line_width: f64) -> Vec<String> {
    wrap_with(&ProportionalMeasurer::default(), text, font_size, max_line_width)
}

/// Height of a block of `line_count` lines: full leading between lines, one
/// bare font size for the last line.
pub fn block_height(line_count: usize, font_size: f64) -> f64 {
    line_count.saturating_sub(1) as f64 * font_size * LINE_HEIGHT_FACTOR + font_size
}

/// Wrap `text` against `diameter` and check the result against 95% of it.
///
/// Split points use the raw diameter while the feasibility check uses the
/// margin, so a line landing between the two is wrapped but rejected.
pub fn fits_with_wrap_with(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f64,
    diameter: f64,
) -> WrapResult {
    let lines = wrap_with(measurer, text, font_size, diameter);
    let available = diameter * SAFETY_MARGIN;

    let widths_fit = lines
        .iter()
        .all(|line| measurer.measure(line, font_size) <= available);
    let height_fits = block_height(lines.len(), font_size) <= available;

    WrapResult {
        fits: widths_fit && height_fits,
        lines,
    }
}

/// [`fits_with_wrap_with`] using the default proportional model.
pub fn fits_with_wrap(text: &str, font_size: f64, diameter: f64) -> WrapResult {
    fits_with_wrap_with(&ProportionalMeasurer::default(), text, font_size, diameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::measure_width;

    #[test]
    fn test_wrap_alpha_beta_gamma_breaks_every_word() {
        // alpha=30, beta=24, gamma=30, gap=3: no two words fit in 40
        let lines = wrap("alpha beta gamma", 10.0, 40.0);
        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_wrap_packs_words_that_fit_together() {
        // Node=24, Label=30, gap=3.6 -> "Node Label" = 57.6
        let lines = wrap("Node Label Text", 6.0, 50.0);
        assert_eq!(lines, vec!["Node Label", "Text"]);
    }

    #[test]
    fn test_wrap_short_text_is_untouched() {
        let text = "  keeps   its spacing ";
        assert_eq!(wrap(text, 1.0, 1000.0), vec![text.to_string()]);
    }

    #[test]
    fn test_wrap_oversized_word_stays_whole() {
        let lines = wrap("Supercalifragilisticexpialidocious", 10.0, 20.0);
        assert_eq!(lines, vec!["Supercalifragilisticexpialidocious"]);
    }

    #[test]
    fn test_wrap_whitespace_only_text_is_kept_verbatim() {
        let lines = wrap("      ", 50.0, 10.0);
        assert_eq!(lines, vec!["      "]);
    }

    #[test]
    fn test_wrap_with_zero_width_puts_each_word_alone() {
        assert_eq!(wrap("a b c", 12.0, 0.0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_block_height_single_line_is_font_size() {
        assert!((block_height(1, 10.0) - 10.0).abs() < 1e-9);
        assert!((block_height(3, 10.0) - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_fits_with_wrap_accepts_three_lines_within_margin() {
        let result = fits_with_wrap("Node Label Text", 13.5, 50.0);
        assert!(result.fits);
        assert_eq!(result.lines, vec!["Node", "Label", "Text"]);
    }

    #[test]
    fn test_fits_with_wrap_rejects_block_too_tall() {
        // 2 * 14 * 1.2 + 14 = 47.6 > 47.5
        let result = fits_with_wrap("Node Label Text", 14.0, 50.0);
        assert!(!result.fits);
        assert_eq!(result.lines.len(), 3);
    }

    #[test]
    fn test_fits_with_wrap_rejects_line_inside_margin_band() {
        // 49.5 <= 50 so no wrap, but 49.5 > 47.5
        let result = fits_with_wrap("Node Label Text", 5.5, 50.0);
        assert!(!result.fits);
        assert_eq!(result.lines, vec!["Node Label Text"]);
    }

    #[test]
    fn test_fits_with_wrap_zero_diameter_never_fits() {
        let result = fits_with_wrap("x", 4.0, 0.0);
        assert!(!result.fits);
        assert_eq!(result.lines, vec!["x"]);
    }

    #[test]
    fn test_fits_with_wrap_is_monotone_for_single_words() {
        for (word, diameter) in [("Protein", 120.0), ("Hub", 30.0), ("Kinase", 60.0)] {
            let mut seen_failure = false;
            for step in 8..=200 {
                let size = f64::from(step) / 2.0;
                let fits = fits_with_wrap(word, size, diameter).fits;
                assert!(
                    !(seen_failure && fits),
                    "{word} fits at {size} after failing at a smaller size"
                );
                seen_failure |= !fits;
            }
        }
    }

    #[test]
    fn test_fits_with_wrap_is_monotone_once_every_word_has_its_own_line() {
        // From 9pt up "Node Label Text" wraps one word per line at diameter 50
        let mut seen_failure = false;
        for step in 18..=80 {
            let size = f64::from(step) / 2.0;
            let fits = fits_with_wrap("Node Label Text", size, 50.0).fits;
            assert!(!(seen_failure && fits), "fits again at {size}");
            seen_failure |= !fits;
        }
        assert!(seen_failure);
    }

    #[test]
    fn test_measure_and_wrap_agree_on_threshold() {
        let text = "Layer";
        let width = measure_width(text, 10.0);
        assert_eq!(wrap(text, 10.0, width), vec![text]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn short_text_is_returned_unchanged(
                text in "[A-Za-z ]{0,40}",
                font_size in 1.0..60.0f64,
                slack in 0.0..100.0f64,
            ) {
                let max = measure_width(&text, font_size) + slack;
                prop_assert_eq!(wrap(&text, font_size, max), vec![text.clone()]);
            }

            #[test]
            fn wrapping_preserves_word_sequence(
                words in prop::collection::vec("[a-zA-Z]{1,10}", 1..12),
                font_size in 1.0..60.0f64,
                max in 0.0..400.0f64,
            ) {
                let text = words.join(" ");
                let lines = wrap(&text, font_size, max);
                let rejoined = lines.join(" ");
                let rewrapped: Vec<&str> = rejoined.split_whitespace().collect();
                let original: Vec<&str> = text.split_whitespace().collect();
                prop_assert_eq!(rewrapped, original);
                prop_assert!(lines.iter().all(|line| !line.is_empty()));
            }

            #[test]
            fn fits_result_carries_the_wrapped_lines(
                words in prop::collection::vec("[a-z]{1,8}", 1..8),
                font_size in 1.0..40.0f64,
                diameter in 1.0..300.0f64,
            ) {
                let text = words.join(" ");
                let result = fits_with_wrap(&text, font_size, diameter);
                prop_assert_eq!(result.lines, wrap(&text, font_size, diameter));
            }
        }
    }
}
