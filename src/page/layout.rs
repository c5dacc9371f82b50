use std::path::Path;

use anyhow::Context;

use crate::{
    content::model::SectionRegistry,
    foundation::{
        core::{Rect, Viewport},
        error::{PlacescapeError, PlacescapeResult},
    },
    scroll::{offset::ScrollOffset, transformer::SignalPolicy, window::ContainerGeometry},
};

/// Page layout and scroll-effect configuration. Every field has a default, so `{}` is a valid
/// config document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub viewport: Viewport,
    /// Hero height in viewport heights.
    pub hero_height_vh: f64,
    /// Section container height in viewport heights.
    pub section_min_height_vh: f64,
    pub footer_height_px: f64,
    /// Viewports narrower than this stack the visual above the text.
    pub narrow_breakpoint_px: u32,
    pub offset: ScrollOffset,
    pub policy: SignalPolicy,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            hero_height_vh: 1.0,
            section_min_height_vh: 1.5,
            footer_height_px: 144.0,
            narrow_breakpoint_px: 768,
            offset: ScrollOffset::default(),
            policy: SignalPolicy::default(),
        }
    }
}

impl PageConfig {
    pub fn validate(&self) -> PlacescapeResult<()> {
        self.viewport.validate()?;
        if !self.hero_height_vh.is_finite() || self.hero_height_vh < 0.0 {
            return Err(PlacescapeError::validation(
                "hero_height_vh must be finite and >= 0",
            ));
        }
        if !self.section_min_height_vh.is_finite() || self.section_min_height_vh <= 0.0 {
            return Err(PlacescapeError::validation(
                "section_min_height_vh must be finite and > 0",
            ));
        }
        if !self.footer_height_px.is_finite() || self.footer_height_px < 0.0 {
            return Err(PlacescapeError::validation(
                "footer_height_px must be finite and >= 0",
            ));
        }
        self.policy.validate()
    }

    pub fn from_json_str(s: &str) -> PlacescapeResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PlacescapeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read page config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn is_narrow(&self) -> bool {
        self.viewport.width < self.narrow_breakpoint_px
    }
}

/// A section's place in the document.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionSlot {
    pub id: String,
    pub index: usize,
    pub container: ContainerGeometry,
}

impl SectionSlot {
    /// Viewport-space top of the section's sticky panel at `scroll_y`.
    ///
    /// The panel sticks to the viewport top while the container covers it, and otherwise scrolls
    /// with the container: `clamp(scroll, top, top + H - vh) - scroll`.
    pub fn panel_top(&self, viewport: Viewport, scroll_y: f64) -> f64 {
        let top = self.container.top_px;
        let last = (self.container.bottom_px() - viewport.height_px()).max(top);
        scroll_y.clamp(top, last) - scroll_y
    }
}

/// Visual and text pane rectangles inside a viewport-sized panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSplit {
    pub visual: Rect,
    pub text: Rect,
}

impl PanelSplit {
    /// Two equal columns when wide; visual on the top third when narrow.
    pub fn for_viewport(viewport: Viewport, narrow: bool) -> Self {
        let (w, h) = (viewport.width_px(), viewport.height_px());
        if narrow {
            let split = (h / 3.0).round();
            Self {
                visual: Rect::new(0.0, 0.0, w, split),
                text: Rect::new(0.0, split, w, h),
            }
        } else {
            let split = (w / 2.0).round();
            Self {
                visual: Rect::new(0.0, 0.0, split, h),
                text: Rect::new(split, 0.0, w, h),
            }
        }
    }
}

/// Vertical document layout: hero, then each section in registry order, then the footer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PageLayout {
    viewport: Viewport,
    narrow: bool,
    hero: ContainerGeometry,
    sections: Vec<SectionSlot>,
    footer: ContainerGeometry,
}

impl PageLayout {
    pub fn compute(registry: &SectionRegistry, config: &PageConfig) -> PlacescapeResult<Self> {
        Self::from_ids(registry.iter().map(|s| s.id.as_str()), config)
    }

    pub(crate) fn from_ids<'a>(
        ids: impl IntoIterator<Item = &'a str>,
        config: &PageConfig,
    ) -> PlacescapeResult<Self> {
        config.validate()?;
        let vh = config.viewport.height_px();

        let hero = ContainerGeometry::new(0.0, config.hero_height_vh * vh);
        let section_h = config.section_min_height_vh * vh;
        let mut y = hero.bottom_px();
        let sections = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let slot = SectionSlot {
                    id: id.to_owned(),
                    index,
                    container: ContainerGeometry::new(y, section_h),
                };
                y += section_h;
                slot
            })
            .collect();
        let footer = ContainerGeometry::new(y, config.footer_height_px);

        Ok(Self {
            viewport: config.viewport,
            narrow: config.is_narrow(),
            hero,
            sections,
            footer,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    pub fn hero(&self) -> ContainerGeometry {
        self.hero
    }

    pub fn footer(&self) -> ContainerGeometry {
        self.footer
    }

    pub fn sections(&self) -> &[SectionSlot] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionSlot> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn total_height(&self) -> f64 {
        self.footer.bottom_px()
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_height() - self.viewport.height_px()).max(0.0)
    }

    /// Clamp a requested scroll offset to `[0, max_scroll]`; non-finite requests map to 0.
    pub fn clamp_scroll(&self, scroll_y: f64) -> f64 {
        if !scroll_y.is_finite() {
            return 0.0;
        }
        scroll_y.clamp(0.0, self.max_scroll())
    }

    pub fn panel_split(&self) -> PanelSplit {
        PanelSplit::for_viewport(self.viewport, self.narrow)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/layout.rs"]
mod tests;
