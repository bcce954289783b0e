//! Chart rendering: SVG markup built in `charts`, rasterized to PNG here.

use std::fs;
use std::path::Path;

use png::{BitDepth, ColorType, Encoder};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::AppError;

pub mod charts;
pub mod svg;

/// Charts are laid out in points; PNGs are written at 1.5x for 150 DPI output.
pub const RASTER_SCALE: f32 = 1.5;

pub fn write_svg(path: &Path, svg: &str) -> Result<(), AppError> {
    fs::write(path, svg)?;
    Ok(())
}

pub fn write_png(path: &Path, svg: &str) -> Result<(), AppError> {
    let png = rasterize(svg, RASTER_SCALE)?;
    fs::write(path, png)?;
    Ok(())
}

/// Render SVG markup to an encoded PNG.
pub fn rasterize(svg: &str, scale: f32) -> Result<Vec<u8>, AppError> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = Tree::from_data(svg.as_bytes(), &options)
        .map_err(|err| AppError::render(format!("SVG parse failed: {err}")))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| AppError::render(format!("cannot allocate {width}x{height} pixmap")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder
        .write_header()
        .map_err(|err| AppError::render(err.to_string()))?
        .write_image_data(pixmap.data())
        .map_err(|err| AppError::render(err.to_string()))?;

    Ok(out)
}
