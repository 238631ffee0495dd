//! Layer color legend drawn in the top-right corner of the diagram.

use crate::gexf::LayerColors;

use super::dom::{Document, Element, format_number, parse_number};

/// Id and class of the legend group.
pub const LEGEND_ID: &str = "legend";

/// Canvas size assumed when the SVG has neither a `viewBox` nor a size.
const FALLBACK_WIDTH: f64 = 2579.6;
const FALLBACK_HEIGHT: f64 = 1936.0;

/// Legend geometry and typography.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub title: String,
    pub font_family: String,
    /// Distance from the canvas edges
    pub margin: f64,
    pub width: f64,
    pub title_font_size: f64,
    pub item_font_size: f64,
    pub swatch_size: f64,
    /// Vertical distance between two entries
    pub item_spacing: f64,
    pub padding: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            title: "Layer".to_string(),
            font_family: "Times New Roman, serif".to_string(),
            margin: 50.0,
            width: 300.0,
            title_font_size: 20.0,
            item_font_size: 16.0,
            swatch_size: 24.0,
            item_spacing: 40.0,
            padding: 15.0,
        }
    }
}

/// Visible area of the document in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Canvas from the root `viewBox`, falling back to `width`/`height`
    /// centered on the origin.
    pub fn of(root: &Element) -> Self {
        if let Some(view_box) = root.attr("viewBox").and_then(parse_view_box) {
            return view_box;
        }
        let width = root
            .attr("width")
            .and_then(parse_number)
            .unwrap_or(FALLBACK_WIDTH);
        let height = root
            .attr("height")
            .and_then(parse_number)
            .unwrap_or(FALLBACK_HEIGHT);
        Self {
            min_x: -width / 2.0,
            min_y: -height / 2.0,
            width,
            height,
        }
    }
}

fn parse_view_box(value: &str) -> Option<Canvas> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers.as_slice() {
        [min_x, min_y, width, height] => Some(Canvas {
            min_x: *min_x,
            min_y: *min_y,
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

/// Build the legend group for `layers` on `canvas`.
pub fn build_legend(canvas: Canvas, layers: &LayerColors, style: &LegendStyle, svg: &Element) -> Element {
    let x = canvas.min_x + canvas.width - style.width - style.margin;
    let y = canvas.min_y + style.margin;
    let name = |local: &str| svg.qualified(local);

    let mut group = Element::new(name("g"))
        .with_attr("id", LEGEND_ID)
        .with_attr("class", LEGEND_ID);

    let background_height = layers.len() as f64 * style.item_spacing
        + style.padding * 2.0
        + style.title_font_size
        + 10.0;
    group.push(
        Element::new(name("rect"))
            .with_attr("x", format_number(x - style.padding))
            .with_attr("y", format_number(y - style.padding))
            .with_attr("width", format_number(style.width))
            .with_attr("height", format_number(background_height))
            .with_attr("fill", "white")
            .with_attr("fill-opacity", "0.9")
            .with_attr("stroke", "black")
            .with_attr("stroke-width", "2"),
    );

    group.push(
        Element::new(name("text"))
            .with_attr("x", format_number(x))
            .with_attr("y", format_number(y + style.title_font_size))
            .with_attr("font-size", format_number(style.title_font_size))
            .with_attr("font-weight", "bold")
            .with_attr("fill", "#000000")
            .with_attr("font-family", style.font_family.clone())
            .with_text(style.title.clone()),
    );

    let first_offset = style.title_font_size + 15.0;
    let swatch_offset = (style.swatch_size / 2.0).floor();
    let baseline_offset = (style.item_font_size / 3.0).floor();
    for (i, (layer, color)) in layers.iter().enumerate() {
        let item_y = y + first_offset + i as f64 * style.item_spacing;

        group.push(
            Element::new(name("rect"))
                .with_attr("x", format_number(x))
                .with_attr("y", format_number(item_y - swatch_offset + 15.0))
                .with_attr("width", format_number(style.swatch_size))
                .with_attr("height", format_number(style.swatch_size))
                .with_attr("fill", color.clone())
                .with_attr("stroke", "#000000")
                .with_attr("stroke-width", "1"),
        );
        group.push(
            Element::new(name("text"))
                .with_attr("x", format_number(x + style.swatch_size + 10.0))
                .with_attr("y", format_number(item_y + baseline_offset + 15.0))
                .with_attr("font-size", format_number(style.item_font_size))
                .with_attr("fill", "#000000")
                .with_attr("font-family", style.font_family.clone())
                .with_text(layer.clone()),
        );
    }

    group
}

/// Append a legend for `layers` to the end of the document.
pub fn add_legend(doc: &mut Document, layers: &LayerColors, style: &LegendStyle) {
    let canvas = Canvas::of(doc.root());
    let legend = build_legend(canvas, layers, style, doc.root());
    doc.root_mut().push(legend);
}
