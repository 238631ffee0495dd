//! Reading node labels out of a Gephi SVG export and writing fits back.
//!
//! Gephi draws node circles inside `<g id="nodes">` and their labels inside
//! `<g id="node-labels">`; a label belongs to the circle sharing its `class`.

use std::collections::HashMap;

use crate::fit::{FitResult, NodeLabel};
use crate::text::LINE_HEIGHT_FACTOR;

use super::dom::{Document, Element, format_number, parse_number};

pub const NODES_GROUP_ID: &str = "nodes";
pub const LABELS_GROUP_ID: &str = "node-labels";

/// Font size assumed when a label has none, or one that does not parse.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Circle diameters keyed by node class, or `None` when either group is
/// missing from the document.
fn node_diameters(doc: &Document) -> Option<HashMap<String, f64>> {
    let nodes = doc.element_by_id(NODES_GROUP_ID)?;
    doc.element_by_id(LABELS_GROUP_ID)?;

    let mut diameters = HashMap::new();
    for circle in nodes.outermost_named("circle") {
        let class = circle.attr("class").unwrap_or_default();
        let radius = circle.attr("r").and_then(parse_number).unwrap_or(0.0);
        diameters.insert(class.to_string(), radius * 2.0);
    }
    Some(diameters)
}

/// Label view of a `<text>` element, if it belongs to a known node and has
/// visible text.
fn label_of(text: &Element, diameters: &HashMap<String, f64>) -> Option<NodeLabel> {
    let class = text.attr("class").unwrap_or_default();
    let diameter = *diameters.get(class)?;
    let content = text.text();
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    Some(NodeLabel {
        node_id: class.to_string(),
        text: content.to_string(),
        diameter,
        font_size: text
            .attr("font-size")
            .and_then(parse_number)
            .unwrap_or(DEFAULT_FONT_SIZE),
    })
}

/// All labels of the diagram, in document order.
///
/// Returns an empty list when the node or label group is missing.
pub fn read_labels(doc: &Document) -> Vec<NodeLabel> {
    let Some(diameters) = node_diameters(doc) else {
        tracing::warn!("Nodes or labels group not found, skipping label fitting");
        return Vec::new();
    };
    let Some(group) = doc.element_by_id(LABELS_GROUP_ID) else {
        return Vec::new();
    };
    group
        .outermost_named("text")
        .into_iter()
        .filter_map(|text| label_of(text, &diameters))
        .collect()
}

/// Write one result per label returned by [`read_labels`] back into the
/// document. `None` leaves the label untouched.
///
/// Returns, per label, whether it was visibly changed: resized or split
/// onto several lines.
pub fn apply_results(doc: &mut Document, results: &[Option<FitResult>]) -> Vec<bool> {
    let Some(diameters) = node_diameters(doc) else {
        return vec![false; results.len()];
    };
    let Some(group) = doc.element_by_id_mut(LABELS_GROUP_ID) else {
        return vec![false; results.len()];
    };

    let targets = group
        .outermost_named_mut("text")
        .into_iter()
        .filter_map(|text| label_of(text, &diameters).map(|label| (text, label)));

    let mut changed = Vec::with_capacity(results.len());
    for ((text, label), result) in targets.zip(results) {
        changed.push(
            result
                .as_ref()
                .is_some_and(|result| apply_fit(text, &label, result)),
        );
    }
    changed.resize(results.len(), false);
    changed
}

/// Apply one fit to a `<text>` element.
///
/// A single line replaces the text content. Several lines become `tspan`s
/// centered vertically on the label's original anchor.
pub fn apply_fit(text: &mut Element, label: &NodeLabel, result: &FitResult) -> bool {
    let resized = (result.font_size - label.font_size).abs() > f64::EPSILON;
    if resized {
        text.set_attr("font-size", format_number(result.font_size));
    }

    match result.lines.as_slice() {
        [] => {}
        [line] => text.set_text(line.clone()),
        lines => {
            let x = text.attr("x").unwrap_or("0").to_string();
            let y = text.attr("y").and_then(parse_number).unwrap_or(0.0);
            let line_height = result.font_size * LINE_HEIGHT_FACTOR;
            let start = y - (lines.len() - 1) as f64 * line_height / 2.0;

            text.children.clear();
            for (i, line) in lines.iter().enumerate() {
                let tspan = Element::new(text.qualified("tspan"))
                    .with_attr("x", x.clone())
                    .with_attr("y", format_number(start + i as f64 * line_height))
                    .with_attr("text-anchor", "middle")
                    .with_attr("dominant-baseline", "central")
                    .with_text(line.clone());
                text.push(tspan);
            }
        }
    }

    resized || result.lines.len() > 1
}
