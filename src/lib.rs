//! Placescape composes a scroll-linked essay page.
//!
//! A [`SectionRegistry`] describes the sections in reading order. Each section gets a scroll
//! transformer that maps its container's progress through the viewport to [`VisualSignals`]
//! (opacity, zoom and blur of its visual). The page can then be:
//!
//! - driven live through a [`PageSession`]
//! - evaluated statelessly at any scroll offset with an [`Evaluator`]
//! - rendered to RGBA frames on the CPU, or swept into PNG-sequence sinks
//! - exported as a static HTML route whose animations run on CSS scroll timelines
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod composition;
pub(crate) mod content;
/// Frame sinks.
pub mod encode;
pub(crate) mod eval;
pub(crate) mod page;
/// Rendering and export.
pub mod render;
pub(crate) mod scroll;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{PlacescapeError, PlacescapeResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::keyframes::{Keyframe, Keyframes, Lerp};
pub use crate::assets::fonts::build_fontdb;
pub use crate::assets::store::{
    DEFAULT_SVG_RASTER_PX, PreparedImage, PreparedVisual, VisualSource, VisualStore,
    normalize_visual_path,
};
pub use crate::composition::dsl::{RegistryBuilder, SectionBuilder, ThemeBuilder};
pub use crate::content::essay::places_and_landscapes;
pub use crate::content::model::{
    Block, FooterCopy, HeroCopy, LabelledRow, ParagraphStyle, SectionDescriptor,
    SectionRegistry, ThemeTokens, index_label,
};
pub use crate::content::palette::{Color, Direction, Fill};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::eval::evaluator::{EvaluatedPage, EvaluatedRegion, EvaluatedSection, Evaluator};
pub use crate::eval::fingerprint::{PageFingerprint, fingerprint_page};
pub use crate::page::layout::{PageConfig, PageLayout, PanelSplit, SectionSlot};
pub use crate::page::session::{PageSession, SectionInstance};
pub use crate::render::backend::{FrameRGBA, RenderSettings};
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::html::export_page;
pub use crate::render::pipeline::{
    MAX_SWEEP_FRAMES, RenderStats, RenderThreading, ScrollSweep, render_frame, render_sweep,
    render_sweep_to_sink,
};
pub use crate::scroll::offset::{Edge, Intersection, ScrollOffset};
pub use crate::scroll::transformer::{ScrollTransformer, SignalPolicy, VisualSignals};
pub use crate::scroll::value::{MotionValue, Subscription};
pub use crate::scroll::window::{ContainerGeometry, ScrollProgress, ScrollWindow};
