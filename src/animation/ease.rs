/// Easing curve applied within one keyframe segment.
///
/// Scroll-linked signals use [`Ease::Linear`] exclusively; the curved variants exist for authored
/// policies loaded from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// CSS `animation-timing-function` equivalent.
    pub fn css_timing(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "cubic-bezier(0.11, 0, 0.5, 0)",
            Self::OutQuad => "cubic-bezier(0.5, 1, 0.89, 1)",
            Self::InOutQuad => "cubic-bezier(0.45, 0, 0.55, 1)",
            Self::InCubic => "cubic-bezier(0.32, 0, 0.67, 0)",
            Self::OutCubic => "cubic-bezier(0.33, 1, 0.68, 1)",
            Self::InOutCubic => "cubic-bezier(0.65, 0, 0.35, 1)",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
