use super::*;
use crate::scroll::offset::ScrollOffset;

fn vp() -> Viewport {
    Viewport::new(1280, 800).unwrap()
}

#[test]
fn section_exit_window_spans_container_height() {
    let c = ContainerGeometry::new(800.0, 1200.0);
    let w = ScrollWindow::resolve(&ScrollOffset::default(), c, vp()).unwrap();
    assert_eq!(w.start_scroll, 800.0);
    assert_eq!(w.end_scroll, 2000.0);

    assert_eq!(w.progress(800.0).value(), 0.0);
    assert_eq!(w.progress(1400.0).value(), 0.5);
    assert_eq!(w.progress(2000.0).value(), 1.0);
}

#[test]
fn progress_clamps_outside_the_window() {
    let c = ContainerGeometry::new(800.0, 1200.0);
    let w = ScrollWindow::resolve(&ScrollOffset::default(), c, vp()).unwrap();
    assert_eq!(w.progress(0.0), ScrollProgress::START);
    assert_eq!(w.progress(99_999.0), ScrollProgress::END);
}

#[test]
fn progress_follows_scroll_backwards() {
    let c = ContainerGeometry::new(0.0, 1000.0);
    let w = ScrollWindow::resolve(&ScrollOffset::default(), c, vp()).unwrap();
    let forward = w.progress(700.0);
    let back = w.progress(300.0);
    assert!(back < forward);
    assert_eq!(back.value(), 0.3);
}

#[test]
fn viewport_relative_offsets_use_viewport_height() {
    let offset = ScrollOffset::parse("start end", "end start").unwrap();
    let c = ContainerGeometry::new(1000.0, 400.0);
    let w = ScrollWindow::resolve(&offset, c, vp()).unwrap();
    assert_eq!(w.start_scroll, 200.0);
    assert_eq!(w.end_scroll, 1400.0);
    assert_eq!(w.scroll_for(ScrollProgress::new(0.5)), 800.0);
}

#[test]
fn zero_height_container_never_produces_a_window() {
    let c = ContainerGeometry::new(500.0, 0.0);
    assert!(ScrollWindow::resolve(&ScrollOffset::default(), c, vp()).is_none());

    let c = ContainerGeometry::new(f64::NAN, 100.0);
    assert!(ScrollWindow::resolve(&ScrollOffset::default(), c, vp()).is_none());
}

#[test]
fn collapsed_window_is_rejected() {
    let offset = ScrollOffset::parse("start start", "start start").unwrap();
    let c = ContainerGeometry::new(0.0, 100.0);
    assert!(ScrollWindow::resolve(&offset, c, vp()).is_none());
}

#[test]
fn nan_progress_maps_to_start() {
    assert_eq!(ScrollProgress::new(f64::NAN), ScrollProgress::START);
}

#[test]
fn intersects_viewport_is_half_open() {
    let c = ContainerGeometry::new(800.0, 200.0);
    assert!(!c.intersects_viewport(vp(), 0.0));
    assert!(c.intersects_viewport(vp(), 1.0));
    assert!(c.intersects_viewport(vp(), 999.0));
    assert!(!c.intersects_viewport(vp(), 1000.0));
}
