use std::sync::Arc;

use crate::{
    content::model::index_label,
    foundation::core::Viewport,
    page::layout::{PageConfig, PageLayout},
    scroll::{
        transformer::{ScrollTransformer, VisualSignals},
        window::{ContainerGeometry, ScrollProgress},
    },
};

/// Snapshot of one section at a scroll offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedSection {
    pub id: String,
    pub index: usize,
    pub label: String,
    pub progress: Option<ScrollProgress>,
    pub signals: VisualSignals,
    /// Whether any part of the container intersects the viewport.
    pub visible: bool,
    /// Viewport-space top of the sticky panel.
    pub panel_top_px: f64,
}

/// Viewport-space placement of a non-animated region (hero, footer).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedRegion {
    pub visible: bool,
    pub top_px: f64,
    pub height_px: f64,
}

impl EvaluatedRegion {
    fn new(c: ContainerGeometry, viewport: Viewport, scroll_y: f64) -> Self {
        Self {
            visible: c.intersects_viewport(viewport, scroll_y),
            top_px: c.top_px - scroll_y,
            height_px: c.height_px,
        }
    }
}

/// Full page snapshot at one scroll offset; everything a renderer needs.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EvaluatedPage {
    pub viewport: Viewport,
    pub narrow: bool,
    pub scroll_y: f64,
    pub hero: EvaluatedRegion,
    pub sections: Vec<EvaluatedSection>,
    pub footer: EvaluatedRegion,
}

impl EvaluatedPage {
    pub fn section(&self, id: &str) -> Option<&EvaluatedSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn visible_sections(&self) -> impl Iterator<Item = &EvaluatedSection> {
        self.sections.iter().filter(|s| s.visible)
    }
}

/// Stateless page evaluator. The same inputs always produce the same [`EvaluatedPage`].
#[derive(Clone, Debug)]
pub struct Evaluator {
    transformer: ScrollTransformer,
}

impl Evaluator {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            transformer: ScrollTransformer::new(config.offset, Arc::new(config.policy.clone())),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, layout))]
    pub fn eval_page(&self, layout: &PageLayout, scroll_y: f64) -> EvaluatedPage {
        let viewport = layout.viewport();
        let scroll_y = layout.clamp_scroll(scroll_y);

        let sections = layout
            .sections()
            .iter()
            .map(|slot| {
                let (progress, signals) =
                    self.transformer
                        .evaluate(slot.container, viewport, scroll_y);
                EvaluatedSection {
                    id: slot.id.clone(),
                    index: slot.index,
                    label: index_label(slot.index),
                    progress,
                    signals,
                    visible: slot.container.intersects_viewport(viewport, scroll_y),
                    panel_top_px: slot.panel_top(viewport, scroll_y),
                }
            })
            .collect();

        EvaluatedPage {
            viewport,
            narrow: layout.is_narrow(),
            scroll_y,
            hero: EvaluatedRegion::new(layout.hero(), viewport, scroll_y),
            sections,
            footer: EvaluatedRegion::new(layout.footer(), viewport, scroll_y),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
