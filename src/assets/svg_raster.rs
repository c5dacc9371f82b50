use std::sync::Arc;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{PlacescapeError, PlacescapeResult},
};

const MAX_DIM: u32 = 16_384;

/// Raster size for an SVG whose longer edge should land on `max_edge_px`.
///
/// The aspect ratio of the SVG's intrinsic size is kept. The result is at least 1x1.
pub fn svg_raster_size(tree: &usvg::Tree, max_edge_px: u32) -> PlacescapeResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(PlacescapeError::evaluation("svg has invalid width/height"));
    }
    if max_edge_px == 0 {
        return Err(PlacescapeError::validation("svg raster edge must be > 0"));
    }

    let k = f64::from(max_edge_px) / w.max(h);
    let out_w = (w * k).round().max(1.0) as u32;
    let out_h = (h * k).round().max(1.0) as u32;

    if out_w > MAX_DIM || out_h > MAX_DIM {
        return Err(PlacescapeError::evaluation(format!(
            "svg raster size too large: {out_w}x{out_h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((out_w, out_h))
}

/// Render `tree` stretched to `width` x `height`. tiny-skia pixmaps are already premultiplied.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> PlacescapeResult<PreparedImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PlacescapeError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}
