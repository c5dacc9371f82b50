use super::*;
use crate::{
    assets::store::VisualStore,
    content::essay::places_and_landscapes,
    encode::sink::InMemorySink,
    foundation::core::Viewport,
    page::layout::PageConfig,
    render::backend::RenderSettings,
};

struct Fixture {
    layout: PageLayout,
    eval: Evaluator,
    renderer: CpuRenderer,
}

fn fixture() -> Fixture {
    let registry = places_and_landscapes().unwrap();
    let cfg = PageConfig {
        viewport: Viewport::new(96, 54).unwrap(),
        ..PageConfig::default()
    };
    let layout = PageLayout::compute(&registry, &cfg).unwrap();
    let visuals = VisualStore::prepare(&registry, None, 32).unwrap();
    let renderer = CpuRenderer::new(
        &registry,
        &layout,
        &visuals,
        RenderSettings {
            draw_text: false,
            ..RenderSettings::default()
        },
    )
    .unwrap();
    Fixture {
        eval: Evaluator::new(&cfg),
        layout,
        renderer,
    }
}

#[test]
fn sweep_offsets_include_both_ends() {
    let offsets = |s: ScrollSweep| s.offsets().collect::<Vec<_>>();
    assert_eq!(offsets(ScrollSweep::new(0.0, 10.0, 4.0).unwrap()), vec![0.0, 4.0, 8.0, 10.0]);
    assert_eq!(offsets(ScrollSweep::new(0.0, 8.0, 4.0).unwrap()), vec![0.0, 4.0, 8.0]);
    assert_eq!(offsets(ScrollSweep::new(5.0, 5.0, 1.0).unwrap()), vec![5.0]);

    assert!(ScrollSweep::new(1.0, 0.0, 1.0).is_err());
    assert!(ScrollSweep::new(0.0, 1.0, 0.0).is_err());
    assert!(ScrollSweep::new(0.0, f64::INFINITY, 1.0).is_err());
}

#[test]
fn oversized_sweeps_are_rejected() {
    let err = ScrollSweep::new(0.0, 8000.0, 1e-300).unwrap_err();
    assert!(err.to_string().contains("exceeds"));
    assert!(ScrollSweep::new(0.0, 8000.0, 1e-3).is_err());
    assert!(ScrollSweep::new(0.0, 100_000.0, 1.0).is_err());

    let at_cap = ScrollSweep::new(0.0, 99_999.0, 1.0).unwrap();
    assert_eq!(at_cap.frame_count(), MAX_SWEEP_FRAMES);
    assert_eq!(at_cap.offsets().count(), MAX_SWEEP_FRAMES);
    assert_eq!(at_cap.offsets().last(), Some(99_999.0));
}

#[test]
fn full_sweep_covers_the_document() {
    let f = fixture();
    let sweep = ScrollSweep::full(&f.layout, 10.0).unwrap();
    let offsets: Vec<f64> = sweep.offsets().collect();
    assert_eq!(offsets.first(), Some(&0.0));
    assert_eq!(offsets.last(), Some(&f.layout.max_scroll()));
}

#[test]
fn render_frame_matches_evaluate_then_render() {
    let f = fixture();
    let a = render_frame(&f.renderer, &f.eval, &f.layout, 120.0).unwrap();
    let b = f.renderer.render(&f.eval.eval_page(&f.layout, 120.0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn elision_reuses_frames_past_the_end_of_the_page() {
    let f = fixture();
    let max = f.layout.max_scroll();
    // Every offset after the first clamps to `max`.
    let sweep = ScrollSweep::new(max - 1.0, max + 40.0, 10.0).unwrap();

    let elide = RenderThreading {
        static_frame_elision: true,
        chunk_size: 4,
        ..RenderThreading::default()
    };
    let (frames, stats) = render_sweep(&f.renderer, &f.eval, &f.layout, sweep, &elide).unwrap();
    assert_eq!(frames.len(), 6);
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 6,
            frames_rendered: 3,
            frames_elided: 3,
        }
    );
    assert!(frames[1..].iter().all(|fr| fr == &frames[1]));

    let (plain, stats) =
        render_sweep(&f.renderer, &f.eval, &f.layout, sweep, &RenderThreading::default()).unwrap();
    assert_eq!(stats.frames_rendered, 6);
    assert_eq!(plain, frames);
}

#[test]
fn parallel_sweep_matches_sequential() {
    let f = fixture();
    let sweep = ScrollSweep::new(0.0, 400.0, 25.0).unwrap();
    let (seq, _) =
        render_sweep(&f.renderer, &f.eval, &f.layout, sweep, &RenderThreading::default()).unwrap();
    let par_threading = RenderThreading {
        parallel: true,
        chunk_size: 5,
        threads: Some(2),
        static_frame_elision: true,
    };
    let (par, stats) = render_sweep(&f.renderer, &f.eval, &f.layout, sweep, &par_threading).unwrap();
    assert_eq!(seq, par);
    assert_eq!(stats.frames_total, 17);

    let bad = RenderThreading {
        parallel: true,
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(render_sweep(&f.renderer, &f.eval, &f.layout, sweep, &bad).is_err());
}

#[test]
fn sink_receives_frames_in_scroll_order() {
    let f = fixture();
    let sweep = ScrollSweep::new(0.0, 100.0, 50.0).unwrap();
    let mut sink = InMemorySink::new();
    let stats = render_sweep_to_sink(
        &f.renderer,
        &f.eval,
        &f.layout,
        sweep,
        &RenderThreading::default(),
        Fps::new(30, 1).unwrap(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(stats.frames_total, 3);
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (96, 54));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    let expected = render_frame(&f.renderer, &f.eval, &f.layout, 50.0).unwrap();
    assert_eq!(sink.frames()[1].1, expected);
}
