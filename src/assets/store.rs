use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::{
        decode::{decode_image, parse_svg},
        svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_size},
    },
    content::model::{PLACEHOLDER_VISUAL, SectionRegistry},
    foundation::error::{PlacescapeError, PlacescapeResult},
};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Prepared SVG represented as a parsed `usvg` tree.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}

/// Where a section's prepared visual came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualSource {
    /// The section's own visual file.
    File(PathBuf),
    /// `placeholder.svg` found in the asset root.
    RootPlaceholder(PathBuf),
    /// Placeholder compiled into the binary.
    BuiltinPlaceholder,
}

#[derive(Clone, Debug)]
pub struct PreparedVisual {
    pub image: Arc<PreparedImage>,
    pub source: VisualSource,
}

const BUILTIN_PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="1200" viewBox="0 0 1200 1200">
  <defs>
    <linearGradient id="sky" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0" stop-color="#334155"/>
      <stop offset="1" stop-color="#0f172a"/>
    </linearGradient>
  </defs>
  <rect width="1200" height="1200" fill="url(#sky)"/>
  <circle cx="860" cy="360" r="90" fill="#94a3b8" fill-opacity="0.6"/>
  <path d="M0 900 L320 520 L560 780 L760 600 L1200 1000 L1200 1200 L0 1200 Z" fill="#1e293b"/>
  <path d="M0 1010 L260 820 L520 980 L820 780 L1200 1080 L1200 1200 L0 1200 Z" fill="#020617"/>
</svg>"##;

/// Default longer-edge raster size for SVG visuals.
pub const DEFAULT_SVG_RASTER_PX: u32 = 1024;

/// Prepared visual for every section of a registry, keyed by section id.
///
/// Visual paths are site-root relative (`/1.png`) and resolve against the asset root. A section
/// whose visual is missing, unreadable or undecodable gets the placeholder instead; preparation
/// only fails if the placeholder itself cannot be produced.
#[derive(Clone, Debug, Default)]
pub struct VisualStore {
    visuals: HashMap<String, PreparedVisual>,
}

impl VisualStore {
    #[tracing::instrument(level = "debug", skip(registry))]
    pub fn prepare(
        registry: &SectionRegistry,
        root: Option<&Path>,
        svg_raster_px: u32,
    ) -> PlacescapeResult<Self> {
        let mut placeholder: Option<PreparedVisual> = None;
        let mut visuals = HashMap::with_capacity(registry.len());

        for section in registry {
            let path = section.visual_path();
            let loaded = match root {
                Some(root) => load_visual(root, path, svg_raster_px).map(|(image, file)| {
                    PreparedVisual {
                        image: Arc::new(image),
                        source: VisualSource::File(file),
                    }
                }),
                None => Err(PlacescapeError::validation("no asset root configured")),
            };

            let visual = match loaded {
                Ok(v) => v,
                Err(err) => {
                    if root.is_some() {
                        tracing::warn!(
                            section = %section.id,
                            visual = path,
                            error = %err,
                            "visual unavailable, using placeholder"
                        );
                    }
                    match &placeholder {
                        Some(p) => p.clone(),
                        None => {
                            let p = prepare_placeholder(root, svg_raster_px)?;
                            placeholder = Some(p.clone());
                            p
                        }
                    }
                }
            };
            visuals.insert(section.id.clone(), visual);
        }

        Ok(Self { visuals })
    }

    pub fn get(&self, section_id: &str) -> Option<&PreparedVisual> {
        self.visuals.get(section_id)
    }

    pub fn image(&self, section_id: &str) -> Option<&Arc<PreparedImage>> {
        self.get(section_id).map(|v| &v.image)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

fn prepare_placeholder(root: Option<&Path>, svg_raster_px: u32) -> PlacescapeResult<PreparedVisual> {
    if let Some(root) = root {
        match load_visual(root, PLACEHOLDER_VISUAL, svg_raster_px) {
            Ok((image, file)) => {
                return Ok(PreparedVisual {
                    image: Arc::new(image),
                    source: VisualSource::RootPlaceholder(file),
                });
            }
            Err(err) => tracing::warn!(
                root = %root.display(),
                error = %err,
                "placeholder.svg unavailable, using built-in placeholder"
            ),
        }
    }
    let svg = parse_svg(BUILTIN_PLACEHOLDER_SVG.as_bytes())?;
    let (w, h) = svg_raster_size(&svg.tree, svg_raster_px)?;
    Ok(PreparedVisual {
        image: Arc::new(rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?),
        source: VisualSource::BuiltinPlaceholder,
    })
}

fn load_visual(
    root: &Path,
    visual_path: &str,
    svg_raster_px: u32,
) -> PlacescapeResult<(PreparedImage, PathBuf)> {
    let rel = normalize_visual_path(visual_path)?;
    let file = root.join(&rel);
    let bytes =
        std::fs::read(&file).with_context(|| format!("read visual '{}'", file.display()))?;

    let image = if is_svg(&rel) {
        let svg = parse_svg(&bytes)?;
        let (w, h) = svg_raster_size(&svg.tree, svg_raster_px)?;
        rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?
    } else {
        decode_image(&bytes)?
    };
    if image.width == 0 || image.height == 0 {
        return Err(PlacescapeError::evaluation(format!(
            "visual '{visual_path}' has zero size"
        )));
    }
    Ok((image, file))
}

fn is_svg(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Normalize a site-root visual path (`/1.png`) to a path relative to the asset root.
///
/// The result uses `/` separators with `.` segments removed; parent traversals (`..`) and empty
/// paths are rejected.
pub fn normalize_visual_path(source: &str) -> PlacescapeResult<String> {
    let s = source.replace('\\', "/");
    let s = s.trim_start_matches('/');
    if s.is_empty() {
        return Err(PlacescapeError::validation("visual path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PlacescapeError::validation(
                "visual paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PlacescapeError::validation(
            "visual path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
