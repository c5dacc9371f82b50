use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    eval::{
        evaluator::{EvaluatedPage, Evaluator},
        fingerprint::{PageFingerprint, fingerprint_page},
    },
    foundation::{
        core::{Fps, FrameIndex},
        error::{PlacescapeError, PlacescapeResult},
    },
    page::layout::PageLayout,
    render::{backend::FrameRGBA, cpu::CpuRenderer},
};

/// Evaluate and render the viewport at a single scroll offset.
pub fn render_frame(
    renderer: &CpuRenderer,
    evaluator: &Evaluator,
    layout: &PageLayout,
    scroll_y: f64,
) -> PlacescapeResult<FrameRGBA> {
    renderer.render(&evaluator.eval_page(layout, scroll_y))
}

/// Upper bound on frames in one sweep.
pub const MAX_SWEEP_FRAMES: usize = 100_000;

/// Scroll offsets sampled every `step_px` from `start` to `end`, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSweep {
    start: f64,
    end: f64,
    step_px: f64,
    frames: usize,
}

impl ScrollSweep {
    pub fn new(start: f64, end: f64, step_px: f64) -> PlacescapeResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PlacescapeError::validation("sweep bounds must be finite"));
        }
        if start > end {
            return Err(PlacescapeError::validation("sweep start must be <= end"));
        }
        if !step_px.is_finite() || step_px <= 0.0 {
            return Err(PlacescapeError::validation("sweep step must be > 0"));
        }
        let frames = sweep_frame_count(end - start, step_px).ok_or_else(|| {
            PlacescapeError::validation(format!(
                "sweep of {} px at {step_px} px per frame exceeds {MAX_SWEEP_FRAMES} frames",
                end - start
            ))
        })?;
        Ok(Self {
            start,
            end,
            step_px,
            frames,
        })
    }

    /// Top of the page to the last scroll position.
    pub fn full(layout: &PageLayout, step_px: f64) -> PlacescapeResult<Self> {
        Self::new(0.0, layout.max_scroll(), step_px)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step_px(&self) -> f64 {
        self.step_px
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.frames;
        (0..n).map(move |i| {
            if i + 1 == n {
                self.end
            } else {
                self.start + i as f64 * self.step_px
            }
        })
    }
}

/// Whole steps in `span` plus the start frame, plus a final frame when the last step falls
/// short of the end. `None` above [`MAX_SWEEP_FRAMES`].
fn sweep_frame_count(span: f64, step_px: f64) -> Option<usize> {
    let steps = (span / step_px).floor();
    if !steps.is_finite() || steps >= MAX_SWEEP_FRAMES as f64 {
        return None;
    }
    let steps = steps as usize;
    let frames = if (steps as f64) * step_px < span {
        steps.checked_add(2)?
    } else {
        steps.checked_add(1)?
    };
    (frames <= MAX_SWEEP_FRAMES).then_some(frames)
}

/// Threading and chunking controls for multi-frame rendering.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render each chunk's frames on a rayon pool.
    pub parallel: bool,
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Render each distinct page once and reuse it for identical offsets.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

impl RenderStats {
    fn absorb(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render every offset of `sweep`, in order.
#[tracing::instrument(level = "debug", skip(renderer, evaluator, layout))]
pub fn render_sweep(
    renderer: &CpuRenderer,
    evaluator: &Evaluator,
    layout: &PageLayout,
    sweep: ScrollSweep,
    threading: &RenderThreading,
) -> PlacescapeResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut out = Vec::with_capacity(sweep.frame_count().min(4096));
    let stats = for_each_chunk(renderer, evaluator, layout, sweep, threading, |chunk| {
        let mut unique = chunk.unique_frames.into_iter().map(Some).collect::<Vec<_>>();
        let mut remaining = vec![0usize; unique.len()];
        for &u in &chunk.frame_to_unique {
            remaining[u] += 1;
        }
        for u in chunk.frame_to_unique {
            remaining[u] -= 1;
            let frame = if remaining[u] == 0 {
                unique[u].take()
            } else {
                unique[u].clone()
            };
            out.push(frame.ok_or_else(|| {
                PlacescapeError::evaluation("internal error: unique frame missing")
            })?);
        }
        Ok(())
    })?;
    Ok((out, stats))
}

/// Render `sweep` straight into `sink` as a video-like frame sequence.
#[tracing::instrument(level = "debug", skip(renderer, evaluator, layout, sink))]
pub fn render_sweep_to_sink(
    renderer: &CpuRenderer,
    evaluator: &Evaluator,
    layout: &PageLayout,
    sweep: ScrollSweep,
    threading: &RenderThreading,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> PlacescapeResult<RenderStats> {
    let viewport = renderer.viewport();
    sink.begin(SinkConfig {
        width: viewport.width,
        height: viewport.height,
        fps,
    })?;

    let mut next = 0u64;
    let stats = for_each_chunk(renderer, evaluator, layout, sweep, threading, |chunk| {
        for &u in &chunk.frame_to_unique {
            let frame = chunk.unique_frames.get(u).ok_or_else(|| {
                PlacescapeError::evaluation(
                    "internal error: unique frame index out of range during encode",
                )
            })?;
            sink.push_frame(FrameIndex(next), frame)?;
            next += 1;
        }
        Ok(())
    })?;

    sink.end()?;
    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "sweep encoded"
    );
    Ok(stats)
}

struct ChunkOut {
    unique_frames: Vec<FrameRGBA>,
    frame_to_unique: Vec<usize>,
    stats: RenderStats,
}

fn for_each_chunk(
    renderer: &CpuRenderer,
    evaluator: &Evaluator,
    layout: &PageLayout,
    sweep: ScrollSweep,
    threading: &RenderThreading,
    mut consume: impl FnMut(ChunkOut) -> PlacescapeResult<()>,
) -> PlacescapeResult<RenderStats> {
    if layout.viewport() != renderer.viewport() {
        return Err(PlacescapeError::validation(
            "renderer and layout disagree on the viewport",
        ));
    }
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut offsets = sweep.offsets();
    let mut stats = RenderStats::default();
    loop {
        let pages: Vec<EvaluatedPage> = offsets
            .by_ref()
            .take(chunk_size)
            .map(|y| evaluator.eval_page(layout, y))
            .collect();
        if pages.is_empty() {
            break;
        }
        let out = render_chunk(renderer, &pages, threading, pool.as_ref())?;
        stats.absorb(out.stats);
        consume(out)?;
    }
    Ok(stats)
}

fn render_chunk(
    renderer: &CpuRenderer,
    pages: &[EvaluatedPage],
    threading: &RenderThreading,
    pool: Option<&rayon::ThreadPool>,
) -> PlacescapeResult<ChunkOut> {
    let mut unique_indices = Vec::<usize>::with_capacity(pages.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(pages.len());
    if threading.static_frame_elision {
        let mut first = HashMap::<PageFingerprint, usize>::new();
        for (idx, page) in pages.iter().enumerate() {
            let fingerprint = fingerprint_page(page);
            if let Some(existing) = first.get(&fingerprint).copied() {
                frame_to_unique.push(existing);
            } else {
                let slot = unique_indices.len();
                unique_indices.push(idx);
                first.insert(fingerprint, slot);
                frame_to_unique.push(slot);
            }
        }
    } else {
        unique_indices.extend(0..pages.len());
        frame_to_unique.extend(0..pages.len());
    }

    let rendered: Vec<PlacescapeResult<FrameRGBA>> = match pool {
        Some(pool) => pool.install(|| {
            unique_indices
                .par_iter()
                .map(|&idx| renderer.render(&pages[idx]))
                .collect()
        }),
        None => unique_indices
            .iter()
            .map(|&idx| renderer.render(&pages[idx]))
            .collect(),
    };
    let unique_frames = rendered.into_iter().collect::<PlacescapeResult<Vec<_>>>()?;

    let total = pages.len() as u64;
    let rendered_count = unique_indices.len() as u64;
    Ok(ChunkOut {
        unique_frames,
        frame_to_unique,
        stats: RenderStats {
            frames_total: total,
            frames_rendered: rendered_count,
            frames_elided: total.saturating_sub(rendered_count),
        },
    })
}

fn build_thread_pool(threads: Option<usize>) -> PlacescapeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PlacescapeError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PlacescapeError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
