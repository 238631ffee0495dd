//! gephi-legend - fit node labels and add a layer legend to Gephi SVG exports.
//!
//! # Usage
//!
//! ```bash
//! gephi-legend graph.gexf graph.svg
//! gephi-legend graph.gexf graph.svg --auto-font-size --smart-ceiling -p
//! gephi-legend graph.gexf graph.svg -o figure.svg --wrap-labels --save
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gephi_legend::annotate::{AnnotateOptions, LabelMode, PngOptions, annotate_files};
use gephi_legend::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use gephi_legend::fit::{DEFAULT_MAX_FONT_SIZE, DEFAULT_MIN_FONT_SIZE, FitConstraints};
use gephi_legend::gexf::DEFAULT_LAYER_ATTRIBUTE;
use gephi_legend::raster::DEFAULT_DPI;
use gephi_legend::svg::LegendStyle;
use gephi_legend::text::MeasureMode;

/// Fit node labels inside Gephi SVG exports and draw a layer color legend
#[derive(Parser, Debug)]
#[command(name = "gephi-legend", version, about, long_about = None)]
struct Cli {
    /// GEXF file carrying the node layers and colors
    #[arg(value_name = "GEXF")]
    gexf: PathBuf,

    /// SVG exported by Gephi
    #[arg(value_name = "SVG")]
    svg: PathBuf,

    /// Output SVG path (default: <SVG>_with_legend.svg)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also export a PNG
    #[arg(short, long)]
    png: bool,

    /// PNG output path (default: output SVG with a .png extension)
    #[arg(long, value_name = "PATH")]
    png_output: Option<PathBuf>,

    /// PNG resolution
    #[arg(long, value_name = "N")]
    dpi: Option<u32>,

    /// Resize node labels so they fit their node
    #[arg(long)]
    auto_font_size: bool,

    /// Wrap labels that are wider than their node, keeping their size
    #[arg(long)]
    wrap_labels: bool,

    /// Cap label sizes at what the largest node can hold
    #[arg(long)]
    smart_ceiling: bool,

    /// Smallest font size auto-fit may choose
    #[arg(long, value_name = "N")]
    min_font_size: Option<f64>,

    /// Largest font size auto-fit may choose
    #[arg(long, value_name = "N")]
    max_font_size: Option<f64>,

    /// How label width is estimated
    #[arg(long, value_enum)]
    measure: Option<MeasureMode>,

    /// Node attribute holding the layer name
    #[arg(long, value_name = "NAME")]
    layer_attribute: Option<String>,

    /// Legend heading
    #[arg(long, value_name = "TEXT", default_value = "Layer")]
    legend_title: String,

    /// Write a JSON report of the run
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Log every label adjustment
    #[arg(short, long)]
    verbose: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn config_flags(&self) -> ConfigFlags {
        ConfigFlags {
            auto_font_size: self.auto_font_size,
            wrap_labels: self.wrap_labels,
            smart_ceiling: self.smart_ceiling,
            png: self.png,
            verbose: self.verbose,
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
            dpi: self.dpi,
            measure: self.measure,
            layer_attribute: self.layer_attribute.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn constraints(flags: &ConfigFlags) -> Result<FitConstraints> {
    let min = flags.min_font_size.unwrap_or(DEFAULT_MIN_FONT_SIZE);
    let max = flags.max_font_size.unwrap_or(DEFAULT_MAX_FONT_SIZE);
    if !(min.is_finite() && min > 0.0) {
        anyhow::bail!("--min-font-size must be a positive number, got {min}");
    }
    if !max.is_finite() || min > max {
        anyhow::bail!("--min-font-size ({min}) must not exceed --max-font-size ({max})");
    }
    Ok(FitConstraints::new(min, max))
}

const fn label_mode(flags: &ConfigFlags) -> LabelMode {
    if flags.auto_font_size {
        LabelMode::Fit
    } else if flags.wrap_labels {
        LabelMode::Wrap
    } else {
        LabelMode::Off
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.config_flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.verbose);

    if !cli.gexf.exists() {
        anyhow::bail!("GEXF file not found: {}", cli.gexf.display());
    }
    if !cli.svg.exists() {
        anyhow::bail!("SVG file not found: {}", cli.svg.display());
    }

    let dpi = effective.dpi.unwrap_or(DEFAULT_DPI);
    if dpi == 0 {
        anyhow::bail!("--dpi must be greater than zero");
    }

    let options = AnnotateOptions {
        label_mode: label_mode(&effective),
        constraints: constraints(&effective)?,
        smart_ceiling: effective.smart_ceiling,
        measure: effective.measure.unwrap_or_default(),
        layer_attribute: effective
            .layer_attribute
            .clone()
            .unwrap_or_else(|| DEFAULT_LAYER_ATTRIBUTE.to_string()),
        legend: LegendStyle {
            title: cli.legend_title.clone(),
            ..LegendStyle::default()
        },
        output: cli.output.clone(),
        png: (effective.png || cli.png_output.is_some()).then(|| PngOptions {
            path: cli.png_output.clone(),
            dpi,
        }),
    };

    let report = annotate_files(&cli.gexf, &cli.svg, &options).context("Annotation failed")?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    info!("Processing complete!");
    info!("Output SVG: {}", report.output_svg.display());
    if let Some(png) = &report.png {
        info!("Output PNG: {}", png.display());
    }
    Ok(())
}
