use super::*;
use crate::{
    content::essay::places_and_landscapes,
    eval::evaluator::Evaluator,
    page::layout::{PageConfig, PageLayout},
};

fn page_at(y: f64) -> EvaluatedPage {
    let cfg = PageConfig::default();
    let layout = PageLayout::compute(&places_and_landscapes().unwrap(), &cfg).unwrap();
    Evaluator::new(&cfg).eval_page(&layout, y)
}

#[test]
fn identical_pages_share_a_fingerprint() {
    assert_eq!(fingerprint_page(&page_at(1234.0)), fingerprint_page(&page_at(1234.0)));
    // Both requests clamp to the last scroll offset.
    assert_eq!(fingerprint_page(&page_at(1.0e7)), fingerprint_page(&page_at(2.0e7)));
}

#[test]
fn scroll_changes_the_fingerprint() {
    assert_ne!(fingerprint_page(&page_at(1000.0)), fingerprint_page(&page_at(1001.0)));
}

#[test]
fn hidden_sections_do_not_affect_the_fingerprint() {
    let a = page_at(10.0);
    let mut b = a.clone();
    let hidden = b.sections.iter_mut().find(|s| !s.visible).unwrap();
    hidden.signals.blur_px = 7.0;
    assert_eq!(fingerprint_page(&a), fingerprint_page(&b));
}

#[test]
fn signed_zero_hashes_alike() {
    let a = page_at(0.0);
    let mut b = a.clone();
    b.hero.top_px = -0.0;
    assert_eq!(fingerprint_page(&a), fingerprint_page(&b));
}
