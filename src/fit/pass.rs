use super::{FitConstraints, FitResult, FontFitter, NodeLabel};

/// Results of fitting every label of one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct FitPass {
    /// One entry per input label, in input order; `None` for blank labels
    pub results: Vec<Option<FitResult>>,
    /// Achievable size of the largest node, when a shared ceiling was used
    pub ceiling: Option<f64>,
}

impl FitPass {
    /// Number of labels that received a result.
    pub fn fitted(&self) -> usize {
        self.results.iter().flatten().count()
    }
}

impl FontFitter {
    /// Fit all labels of a diagram.
    ///
    /// With `shared_ceiling`, the largest node is solved first and its size
    /// caps the range for every label, the largest one included.
    pub fn fit_labels(
        &self,
        labels: &[NodeLabel],
        constraints: FitConstraints,
        shared_ceiling: bool,
    ) -> FitPass {
        let ceiling = if shared_ceiling {
            self.smart_ceiling(labels, constraints)
        } else {
            None
        };
        let effective = ceiling.map_or(constraints, |cap| constraints.with_ceiling(cap));

        let results = labels
            .iter()
            .map(|label| self.fit_label(label, effective))
            .collect();

        FitPass { results, ceiling }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(node_id: &str, text: &str, diameter: f64) -> NodeLabel {
        NodeLabel {
            node_id: node_id.to_string(),
            text: text.to_string(),
            diameter,
            font_size: 12.0,
        }
    }

    fn sizes(pass: &FitPass) -> Vec<Option<f64>> {
        pass.results
            .iter()
            .map(|result| result.as_ref().map(|r| r.font_size))
            .collect()
    }

    #[test]
    fn test_fit_labels_without_ceiling_sizes_independently() {
        let fitter = FontFitter::default();
        let labels = vec![
            label("a", "metabolic pathway regulation", 200.0),
            label("b", "hub", 150.0),
            label("c", "signal", 40.0),
        ];
        let pass = fitter.fit_labels(&labels, FitConstraints::default(), false);
        assert_eq!(pass.ceiling, None);
        assert_eq!(sizes(&pass), vec![Some(31.5), Some(79.0), Some(10.5)]);
    }

    #[test]
    fn test_fit_labels_with_ceiling_caps_small_nodes() {
        let fitter = FontFitter::default();
        let labels = vec![
            label("a", "metabolic pathway regulation", 200.0),
            label("b", "hub", 150.0),
            label("c", "signal", 40.0),
        ];
        let pass = fitter.fit_labels(&labels, FitConstraints::default(), true);
        assert_eq!(pass.ceiling, Some(31.5));
        assert_eq!(sizes(&pass), vec![Some(31.5), Some(31.5), Some(10.5)]);
        let hub = pass.results[1].as_ref().unwrap();
        assert_eq!(hub.lines, vec!["Hub"]);
    }

    #[test]
    fn test_fit_labels_keeps_blank_slots() {
        let fitter = FontFitter::default();
        let labels = vec![label("a", "  ", 100.0), label("b", "kinase", 60.0)];
        let pass = fitter.fit_labels(&labels, FitConstraints::default(), true);
        assert_eq!(pass.results.len(), 2);
        assert!(pass.results[0].is_none());
        assert_eq!(pass.fitted(), 1);
        assert_eq!(pass.ceiling, Some(15.5));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_label() -> impl Strategy<Value = NodeLabel> {
            (
                prop::collection::vec("[a-z]{1,10}", 0..4),
                0.0..300.0f64,
                4.0..40.0f64,
            )
                .prop_map(|(words, diameter, font_size)| NodeLabel {
                    node_id: String::from("n"),
                    text: words.join(" "),
                    diameter,
                    font_size,
                })
        }

        proptest! {
            #[test]
            fn no_label_exceeds_the_shared_ceiling(
                labels in prop::collection::vec(arb_label(), 1..12),
            ) {
                let fitter = FontFitter::default();
                let constraints = FitConstraints::default();
                let pass = fitter.fit_labels(&labels, constraints, true);
                if let Some(ceiling) = pass.ceiling {
                    for result in pass.results.iter().flatten() {
                        prop_assert!(result.font_size <= ceiling);
                        prop_assert!(result.font_size >= constraints.min_font_size);
                    }
                } else {
                    prop_assert_eq!(pass.fitted(), 0);
                }
            }
        }
    }
}
