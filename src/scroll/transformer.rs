use std::sync::Arc;

use crate::{
    animation::keyframes::Keyframes,
    foundation::core::Viewport,
    foundation::error::{PlacescapeError, PlacescapeResult},
    foundation::math::css_number,
    scroll::offset::ScrollOffset,
    scroll::window::{ContainerGeometry, ScrollProgress, ScrollWindow},
};

/// The three continuous values a section's visual layer is painted with.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualSignals {
    /// Group opacity of the sticky panel, `[0, 1]`.
    pub opacity: f64,
    /// Uniform zoom of the visual pane about its centre.
    pub scale: f64,
    /// Gaussian blur radius of the visual, in CSS px.
    pub blur_px: f64,
}

impl VisualSignals {
    /// Values before any scroll measurement exists.
    pub const INITIAL: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        blur_px: 0.0,
    };

    /// CSS `filter` value. Zero blur is emitted as `none`, which paints identically to
    /// `blur(0px)`.
    pub fn css_filter(&self) -> String {
        if self.blur_px > 0.0 {
            format!("blur({}px)", css_number(self.blur_px))
        } else {
            "none".to_string()
        }
    }
}

impl Default for VisualSignals {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Keyframe tracks mapping scroll progress to [`VisualSignals`].
///
/// Each track is an independent function of progress; there is no coupling between them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalPolicy {
    pub opacity: Keyframes<f64>,
    pub scale: Keyframes<f64>,
    pub blur_px: Keyframes<f64>,
}

impl SignalPolicy {
    /// Opacity holds at 1 until 80% then fades out, scale grows 1 → 1.2 across the window, blur
    /// stays at 0 until halfway then ramps to 10px.
    pub fn section_exit() -> Self {
        Self {
            opacity: Keyframes::linear_unchecked(&[(0.0, 1.0), (0.8, 1.0), (1.0, 0.0)]),
            scale: Keyframes::linear_unchecked(&[(0.0, 1.0), (1.0, 1.2)]),
            blur_px: Keyframes::linear_unchecked(&[(0.0, 0.0), (0.5, 0.0), (1.0, 10.0)]),
        }
    }

    pub fn validate(&self) -> PlacescapeResult<()> {
        for (name, track) in [
            ("opacity", &self.opacity),
            ("scale", &self.scale),
            ("blur_px", &self.blur_px),
        ] {
            if track.keys().iter().any(|k| !(0.0..=1.0).contains(&k.at)) {
                return Err(PlacescapeError::validation(format!(
                    "{name} stops must lie within scroll progress [0, 1]"
                )));
            }
            if track.keys().iter().any(|k| !k.value.is_finite()) {
                return Err(PlacescapeError::validation(format!(
                    "{name} values must be finite"
                )));
            }
        }
        if self
            .opacity
            .keys()
            .iter()
            .any(|k| !(0.0..=1.0).contains(&k.value))
        {
            return Err(PlacescapeError::validation(
                "opacity values must lie within [0, 1]",
            ));
        }
        if self.scale.keys().iter().any(|k| k.value <= 0.0) {
            return Err(PlacescapeError::validation("scale values must be > 0"));
        }
        if self.blur_px.keys().iter().any(|k| k.value < 0.0) {
            return Err(PlacescapeError::validation("blur values must be >= 0"));
        }
        Ok(())
    }

    pub fn signals_at(&self, progress: ScrollProgress) -> VisualSignals {
        let p = progress.value();
        VisualSignals {
            opacity: self.opacity.sample(p),
            scale: self.scale.sample(p),
            blur_px: self.blur_px.sample(p),
        }
    }

    /// Signals for a container that has not produced progress yet.
    pub fn initial(&self) -> VisualSignals {
        VisualSignals {
            opacity: self.opacity.initial(),
            scale: self.scale.initial(),
            blur_px: self.blur_px.initial(),
        }
    }

    /// Union of all track breakpoints, ascending and deduplicated.
    ///
    /// Sampling every track at these stops and interpolating linearly between them reproduces
    /// linear tracks exactly.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut stops: Vec<f64> = [&self.opacity, &self.scale, &self.blur_px]
            .iter()
            .flat_map(|t| t.stops())
            .collect();
        stops.sort_by(f64::total_cmp);
        stops.dedup();
        stops
    }
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self::section_exit()
    }
}

/// Per-section observer: resolves a container's window and maps progress to signals.
///
/// Holds no scroll state of its own; every call is a pure function of its arguments. The policy
/// is shared between instances, the geometry is not.
#[derive(Clone, Debug)]
pub struct ScrollTransformer {
    offset: ScrollOffset,
    policy: Arc<SignalPolicy>,
}

impl ScrollTransformer {
    pub fn new(offset: ScrollOffset, policy: Arc<SignalPolicy>) -> Self {
        Self { offset, policy }
    }

    pub fn offset(&self) -> &ScrollOffset {
        &self.offset
    }

    pub fn policy(&self) -> &SignalPolicy {
        &self.policy
    }

    pub fn window(&self, container: ContainerGeometry, viewport: Viewport) -> Option<ScrollWindow> {
        ScrollWindow::resolve(&self.offset, container, viewport)
    }

    pub fn observe(
        &self,
        container: ContainerGeometry,
        viewport: Viewport,
        scroll_y: f64,
    ) -> Option<ScrollProgress> {
        self.window(container, viewport)
            .map(|w| w.progress(scroll_y))
    }

    pub fn signals(&self, progress: Option<ScrollProgress>) -> VisualSignals {
        match progress {
            Some(p) => self.policy.signals_at(p),
            None => self.policy.initial(),
        }
    }

    pub fn evaluate(
        &self,
        container: ContainerGeometry,
        viewport: Viewport,
        scroll_y: f64,
    ) -> (Option<ScrollProgress>, VisualSignals) {
        let progress = self.observe(container, viewport, scroll_y);
        (progress, self.signals(progress))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/transformer.rs"]
mod tests;
