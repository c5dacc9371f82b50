use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::content::essay::places_and_landscapes;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn session() -> PageSession {
    PageSession::new(&places_and_landscapes().unwrap(), PageConfig::default()).unwrap()
}

#[test]
fn one_instance_per_section_in_registry_order() {
    let s = session();
    let ids: Vec<&str> = s.instances().iter().map(SectionInstance::id).collect();
    assert_eq!(
        ids,
        vec![
            "mental-map",
            "microclimate",
            "breakfast",
            "third-places",
            "population"
        ]
    );
    assert_eq!(s.instance("breakfast").unwrap().label(), "03");
    assert!(s.instance("nope").is_none());
}

#[test]
fn instances_start_at_initial_signals() {
    let s = session();
    for inst in s.instances() {
        assert_eq!(inst.signals(), VisualSignals::INITIAL);
        assert_eq!(inst.progress(), Some(ScrollProgress::START));
    }
}

#[test]
fn each_instance_observes_only_its_own_window() {
    let mut s = session();
    // Default viewport is 1280x720: mental-map spans [720, 1800).
    s.scroll_to(720.0 + 0.8 * 1080.0);

    let mm = s.signals("mental-map").unwrap();
    assert!(approx(mm.scale, 1.16));
    assert!(approx(mm.blur_px, 6.0));
    assert_eq!(s.signals("microclimate").unwrap(), VisualSignals::INITIAL);

    s.scroll_to(1800.0);
    assert_eq!(s.progress("mental-map"), Some(ScrollProgress::END));
    assert_eq!(s.progress("microclimate"), Some(ScrollProgress::START));
    assert_eq!(s.signals("microclimate").unwrap(), VisualSignals::INITIAL);
}

#[test]
fn scrolling_back_up_reverses_progress() {
    let mut s = session();
    s.scroll_to(1500.0);
    let down = s.progress("mental-map").unwrap();
    s.scroll_to(1000.0);
    let up = s.progress("mental-map").unwrap();
    assert!(up < down);
}

#[test]
fn scroll_is_clamped_to_the_document() {
    let mut s = session();
    s.scroll_to(-400.0);
    assert_eq!(s.scroll_y(), 0.0);
    s.scroll_to(1.0e12);
    assert_eq!(s.scroll_y(), s.layout().max_scroll());
    s.scroll_by(-100.0);
    assert_eq!(s.scroll_y(), s.layout().max_scroll() - 100.0);
}

#[test]
fn subscribers_hear_only_real_changes() {
    let mut s = session();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = s
        .subscribe("mental-map", move |v| sink.borrow_mut().push(*v))
        .unwrap();

    s.scroll_to(300.0);
    assert!(seen.borrow().is_empty());

    let changed = s.scroll_to(1584.0);
    assert_eq!(changed, 1);
    assert_eq!(seen.borrow().len(), 1);

    assert_eq!(s.scroll_to(1584.0), 0);
    assert_eq!(seen.borrow().len(), 1);

    assert!(s.unsubscribe("mental-map", sub));
    s.scroll_to(1700.0);
    assert_eq!(seen.borrow().len(), 1);

    assert!(s.subscribe("nope", |_| {}).is_err());
    assert!(!s.unsubscribe("nope", sub));
}

#[test]
fn scroll_for_inverts_progress() {
    let mut s = session();
    let y = s.scroll_for("breakfast", ScrollProgress::new(0.5)).unwrap();
    s.scroll_to(y);
    assert!(approx(s.progress("breakfast").unwrap().value(), 0.5));
}

#[test]
fn resize_relays_out_every_instance() {
    let mut s = session();
    s.scroll_to(1584.0);
    s.resize(Viewport::new(390, 844).unwrap()).unwrap();

    assert!(s.layout().is_narrow());
    let mm = s.instance("mental-map").unwrap();
    assert_eq!(mm.container().top_px, 844.0);
    assert_eq!(mm.container().height_px, 1.5 * 844.0);
    let expected = (1584.0 - 844.0) / (1.5 * 844.0);
    assert!(approx(mm.progress().unwrap().value(), expected));

    assert!(s.resize(Viewport { width: 0, height: 10 }).is_err());
}
