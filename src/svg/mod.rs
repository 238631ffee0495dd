//! Gephi SVG exports: parsing, label rewriting and the legend.

pub mod dom;
pub mod labels;
pub mod legend;

pub use dom::{Document, Element, Node};
pub use labels::{apply_fit, apply_results, read_labels};
pub use legend::{LegendStyle, add_legend};
