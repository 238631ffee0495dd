//! The per-document annotation pass.
//!
//! Reads the layer colors from the graph file, fits every node label of the
//! SVG export, draws the legend and writes the result next to the source.
//! The source SVG is never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fit::{FitConstraints, FitPass, FontFitter, NodeLabel};
use crate::gexf::{self, LayerColors};
use crate::raster;
use crate::svg::{self, Document, LegendStyle};
use crate::text::MeasureMode;

/// What happens to node labels.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMode {
    /// Leave labels exactly as they are
    #[default]
    Off,
    /// Wrap labels at their current font size
    Wrap,
    /// Choose font size and line breaks so labels fit their node
    Fit,
}

/// PNG export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngOptions {
    /// Output path; defaults to the output SVG with a `.png` extension
    pub path: Option<PathBuf>,
    pub dpi: u32,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            path: None,
            dpi: raster::DEFAULT_DPI,
        }
    }
}

/// Options for one annotation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateOptions {
    pub label_mode: LabelMode,
    pub constraints: FitConstraints,
    /// Cap every label at the size the largest node can hold
    pub smart_ceiling: bool,
    pub measure: MeasureMode,
    pub layer_attribute: String,
    pub legend: LegendStyle,
    /// Output SVG path; defaults to `<source>_with_legend.svg`
    pub output: Option<PathBuf>,
    pub png: Option<PngOptions>,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::default(),
            constraints: FitConstraints::default(),
            smart_ceiling: false,
            measure: MeasureMode::default(),
            layer_attribute: gexf::DEFAULT_LAYER_ATTRIBUTE.to_string(),
            legend: LegendStyle::default(),
            output: None,
            png: None,
        }
    }
}

/// Final state of one label after the pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelOutcome {
    pub node_id: String,
    pub font_size: f64,
    pub lines: Vec<String>,
    /// Resized or split onto several lines
    pub modified: bool,
}

/// Result of annotating an in-memory document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotateSummary {
    pub labels: Vec<LabelOutcome>,
    pub modified: usize,
    /// Achievable size of the largest node, when the shared ceiling was used
    pub ceiling: Option<f64>,
}

/// Everything a file-level run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotateReport {
    pub output_svg: PathBuf,
    pub png: Option<PathBuf>,
    pub layers: LayerColors,
    #[serde(flatten)]
    pub summary: AnnotateSummary,
}

impl AnnotateReport {
    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n").map_err(|err| Error::write(path, err))
    }
}

/// Fit labels according to `options` and draw the legend, in memory.
pub fn annotate_document(
    doc: &mut Document,
    layers: &LayerColors,
    options: &AnnotateOptions,
) -> AnnotateSummary {
    let summary = adjust_labels(doc, options);
    svg::add_legend(doc, layers, &options.legend);
    summary
}

fn adjust_labels(doc: &mut Document, options: &AnnotateOptions) -> AnnotateSummary {
    if options.label_mode == LabelMode::Off {
        return AnnotateSummary {
            labels: Vec::new(),
            modified: 0,
            ceiling: None,
        };
    }

    let labels = svg::read_labels(doc);
    let fitter = FontFitter::for_mode(options.measure);
    let pass = match options.label_mode {
        LabelMode::Fit => {
            info!("Auto-adjusting node label font sizes and checking text wrapping...");
            fitter.fit_labels(&labels, options.constraints, options.smart_ceiling)
        }
        LabelMode::Wrap | LabelMode::Off => {
            info!("Checking and adjusting node label text...");
            FitPass {
                results: labels.iter().map(|label| fitter.wrap_label(label)).collect(),
                ceiling: None,
            }
        }
    };
    if let Some(ceiling) = pass.ceiling {
        info!("Largest node sustains {ceiling:.1}pt, using it as the font size ceiling");
    }

    let changed = svg::apply_results(doc, &pass.results);
    let outcomes: Vec<LabelOutcome> = labels
        .iter()
        .zip(&pass.results)
        .zip(changed)
        .filter_map(|((label, result), modified)| {
            let result = result.as_ref()?;
            log_outcome(label, result.font_size, result.lines.len(), modified);
            Some(LabelOutcome {
                node_id: label.node_id.clone(),
                font_size: result.font_size,
                lines: result.lines.clone(),
                modified,
            })
        })
        .collect();

    let modified = outcomes.iter().filter(|outcome| outcome.modified).count();
    if modified > 0 {
        info!("Adjusted {modified} node labels");
    } else {
        info!("All node label texts already fit within node diameter, no adjustment needed");
    }

    AnnotateSummary {
        labels: outcomes,
        modified,
        ceiling: pass.ceiling,
    }
}

fn log_outcome(label: &NodeLabel, font_size: f64, line_count: usize, modified: bool) {
    if !modified {
        return;
    }
    let preview: String = label.text.chars().take(30).collect();
    debug!(
        node = label.node_id.as_str(),
        from = label.font_size,
        to = font_size,
        lines = line_count,
        "adjusted label '{preview}'"
    );
}

/// Default output path for an annotated copy of `svg`.
pub fn default_output_path(svg: &Path) -> PathBuf {
    let stem = svg
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    svg.with_file_name(format!("{stem}_with_legend.svg"))
}

/// Output path for the annotated SVG, never equal to the source.
pub fn resolve_output_path(svg: &Path, requested: Option<&Path>) -> PathBuf {
    let Some(requested) = requested else {
        return default_output_path(svg);
    };
    if same_file(svg, requested) {
        let renamed = default_output_path(svg);
        warn!(
            "Output file cannot be the same as source file, automatically renamed to: {}",
            renamed.display()
        );
        return renamed;
    }
    requested.to_path_buf()
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Run the whole pass on files.
///
/// # Errors
///
/// Returns an error if either input cannot be read or parsed, or an output
/// cannot be written. Nothing is written when an input fails.
pub fn annotate_files(gexf_path: &Path, svg_path: &Path, options: &AnnotateOptions) -> Result<AnnotateReport> {
    info!("Parsing GEXF file: {}", gexf_path.display());
    let layers = gexf::read_layer_colors(gexf_path, &options.layer_attribute)?;
    for (layer, color) in &layers {
        info!("Layer: {layer} -> {color}");
    }
    info!("Found {} different layers", layers.len());

    info!("Processing SVG file: {}", svg_path.display());
    let source = fs::read_to_string(svg_path).map_err(|err| Error::read(svg_path, err))?;
    let mut doc = Document::parse(&source)?;
    let summary = annotate_document(&mut doc, &layers, options);

    let output_svg = resolve_output_path(svg_path, options.output.as_deref());
    fs::write(&output_svg, doc.to_xml_string()).map_err(|err| Error::write(&output_svg, err))?;
    info!("Saved SVG file: {}", output_svg.display());

    let png = match &options.png {
        Some(png) => {
            let png_path = png
                .path
                .clone()
                .unwrap_or_else(|| output_svg.with_extension("png"));
            raster::save_png(&output_svg, &png_path, png.dpi)?;
            Some(png_path)
        }
        None => None,
    };

    Ok(AnnotateReport {
        output_svg,
        png,
        layers,
        summary,
    })
}
