use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::{Canvas, Rgba8Premul},
    error::{PlacescapeError, PlacescapeResult},
};

/// A rendered viewport frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let p = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            };
            out.extend_from_slice(&p.to_straight_rgba());
        }
        out
    }

    /// Write the frame as a PNG, creating the parent directory if needed.
    pub fn save_png(&self, path: &Path) -> PlacescapeResult<()> {
        if self.data.len() != self.canvas().byte_len() {
            return Err(PlacescapeError::evaluation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        crate::encode::sink::ensure_parent_dir(path)?;
        image::save_buffer(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Renderer settings shared by every worker.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Colour the frame is cleared to before painting (straight RGBA8).
    pub clear_rgba: [u8; 4],
    /// Longer-edge raster size for SVG visuals.
    pub svg_raster_px: u32,
    /// Draw hero, title and footer copy.
    pub draw_text: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 255],
            svg_raster_px: crate::assets::store::DEFAULT_SVG_RASTER_PX,
            draw_text: true,
        }
    }
}
