//! Frame rendering and static HTML export.

/// Frame buffers and render settings.
pub mod backend;
pub(crate) mod blur;
pub(crate) mod composite;
/// CPU viewport renderer.
pub mod cpu;
/// Static HTML route export.
pub mod html;
/// Single-frame and scroll-sweep rendering.
pub mod pipeline;
pub(crate) mod text;
