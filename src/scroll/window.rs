use crate::{
    foundation::core::Viewport,
    scroll::offset::{Intersection, ScrollOffset},
};

/// A container's vertical extent in document coordinates (CSS px).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContainerGeometry {
    pub top_px: f64,
    pub height_px: f64,
}

impl ContainerGeometry {
    pub fn new(top_px: f64, height_px: f64) -> Self {
        Self { top_px, height_px }
    }

    pub fn bottom_px(self) -> f64 {
        self.top_px + self.height_px
    }

    /// Whether any part of the container is inside the viewport at `scroll_y`.
    pub fn intersects_viewport(self, viewport: Viewport, scroll_y: f64) -> bool {
        self.height_px > 0.0
            && self.top_px < scroll_y + viewport.height_px()
            && self.bottom_px() > scroll_y
    }
}

/// Normalized position inside a scroll window, always in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub const START: Self = Self(0.0);
    pub const END: Self = Self(1.0);

    /// Clamp `raw` into `[0, 1]`; NaN maps to the window start.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::START;
        }
        Self(raw.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Scroll offsets (document px) at which a container's window starts and ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollWindow {
    pub start_scroll: f64,
    pub end_scroll: f64,
}

impl ScrollWindow {
    /// Resolve `offset` against a container and viewport.
    ///
    /// Returns `None` when the container has no height or the window collapses to a single
    /// scroll position; such a container never produces progress.
    pub fn resolve(
        offset: &ScrollOffset,
        container: ContainerGeometry,
        viewport: Viewport,
    ) -> Option<Self> {
        if !container.top_px.is_finite()
            || !container.height_px.is_finite()
            || container.height_px <= 0.0
        {
            return None;
        }

        let at = |i: Intersection| {
            container.top_px + i.target.fraction() * container.height_px
                - i.viewport.fraction() * viewport.height_px()
        };
        let start_scroll = at(offset.start);
        let end_scroll = at(offset.end);
        let len = end_scroll - start_scroll;
        if !len.is_finite() || len.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            start_scroll,
            end_scroll,
        })
    }

    pub fn len(self) -> f64 {
        self.end_scroll - self.start_scroll
    }

    pub fn progress(self, scroll_y: f64) -> ScrollProgress {
        ScrollProgress::new((scroll_y - self.start_scroll) / self.len())
    }

    /// Scroll offset at which progress equals `p`.
    pub fn scroll_for(self, p: ScrollProgress) -> f64 {
        self.start_scroll + p.value() * self.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/window.rs"]
mod tests;
