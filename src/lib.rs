// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. fit::FitResult)
    clippy::module_name_repetitions
)]

//! # gephi-legend
//!
//! Post-processing for diagrams exported from Gephi.
//!
//! Given the graph file (GEXF) and its SVG export, gephi-legend:
//! - Reads the color of every node layer from the GEXF
//! - Sizes and wraps each node label so it fits inside its circle
//! - Draws a layer color legend in the top-right corner
//! - Optionally rasterizes the result to PNG
//!
//! ## Modules
//!
//! - [`text`]: Width estimation and greedy word wrapping
//! - [`fit`]: Font size search and the shared ceiling
//! - [`gexf`]: Layer colors from the graph file
//! - [`svg`]: Editable SVG tree, node labels and the legend
//! - [`raster`]: PNG export
//! - [`annotate`]: The end-to-end pass
//! - [`config`]: Saved command-line defaults

pub mod annotate;
pub mod config;
pub mod error;
pub mod fit;
pub mod gexf;
pub mod raster;
pub mod svg;
pub mod text;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::annotate::{AnnotateOptions, AnnotateReport, LabelMode, annotate_files};
    pub use crate::fit::{FitConstraints, FitResult, FontFitter, NodeLabel};
    pub use crate::svg::Document;
}
