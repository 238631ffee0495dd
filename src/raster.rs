//! SVG to PNG conversion.
//!
//! Rasterizes the annotated SVG with `resvg`, using system fonts for label
//! and legend text.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use resvg::usvg::fontdb;

use crate::error::{Error, Result};

/// Resolution the SVG user unit is defined at.
const CSS_DPI: f64 = 96.0;

/// Default output resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Rasterize SVG source at `dpi`.
///
/// One user unit maps to `dpi / 96` pixels, so 96 DPI renders at the SVG's
/// own size.
///
/// # Errors
///
/// Returns an error if the SVG cannot be parsed or the target size is empty
/// or too large.
pub fn render_png(svg: &str, dpi: u32) -> Result<RgbaImage> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let opts = resvg::usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    };

    let tree =
        resvg::usvg::Tree::from_str(svg, &opts).map_err(|err| Error::Raster(err.to_string()))?;
    let size = tree.size();

    let scale = (f64::from(dpi) / CSS_DPI) as f32;

    #[allow(clippy::cast_sign_loss)]
    let width = (size.width() * scale).ceil() as u32;
    #[allow(clippy::cast_sign_loss)]
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Raster(format!("failed to create pixmap {width}x{height}")))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| Error::Raster("failed to create image from pixmap data".to_string()))
}

/// Rasterize the SVG file at `svg_path` into a PNG at `png_path`.
///
/// # Errors
///
/// Returns an error if the SVG cannot be read or rendered, or the PNG cannot
/// be written.
pub fn save_png(svg_path: &Path, png_path: &Path, dpi: u32) -> Result<()> {
    let svg = std::fs::read_to_string(svg_path).map_err(|err| Error::read(svg_path, err))?;
    let image = render_png(&svg, dpi)?;
    image.save_with_format(png_path, image::ImageFormat::Png)?;
    tracing::info!("SVG converted to PNG: {} (DPI: {dpi})", png_path.display());
    Ok(())
}
