use super::*;
use crate::{content::essay::places_and_landscapes, page::session::PageSession};

fn setup() -> (PageConfig, PageLayout) {
    let cfg = PageConfig::default();
    let layout = PageLayout::compute(&places_and_landscapes().unwrap(), &cfg).unwrap();
    (cfg, layout)
}

#[test]
fn top_of_page_shows_only_the_hero() {
    let (cfg, layout) = setup();
    let page = Evaluator::new(&cfg).eval_page(&layout, 0.0);
    assert!(page.hero.visible);
    assert_eq!(page.hero.top_px, 0.0);
    assert_eq!(page.visible_sections().count(), 0);
    assert!(!page.footer.visible);
    assert_eq!(page.sections[0].label, "01");
    assert_eq!(page.sections[4].label, "05");
}

#[test]
fn panel_rides_in_then_sticks() {
    let (cfg, layout) = setup();
    let eval = Evaluator::new(&cfg);

    let page = eval.eval_page(&layout, 100.0);
    let mm = page.section("mental-map").unwrap();
    assert!(mm.visible);
    assert_eq!(mm.panel_top_px, 620.0);

    let page = eval.eval_page(&layout, 1000.0);
    assert_eq!(page.section("mental-map").unwrap().panel_top_px, 0.0);
    assert!(!page.hero.visible);
}

#[test]
fn bottom_of_page_shows_the_footer() {
    let (cfg, layout) = setup();
    let page = Evaluator::new(&cfg).eval_page(&layout, f64::INFINITY);
    assert_eq!(page.scroll_y, 0.0);

    let page = Evaluator::new(&cfg).eval_page(&layout, 1.0e9);
    assert_eq!(page.scroll_y, layout.max_scroll());
    assert!(page.footer.visible);
    assert!(page.section("population").unwrap().visible);
}

#[test]
fn agrees_with_a_live_session() {
    let (cfg, layout) = setup();
    let eval = Evaluator::new(&cfg);
    let mut session = PageSession::new(&places_and_landscapes().unwrap(), cfg).unwrap();

    for y in [0.0, 650.0, 1584.0, 2400.0, 3333.0, 5000.0] {
        session.scroll_to(y);
        let page = eval.eval_page(&layout, y);
        for s in &page.sections {
            assert_eq!(Some(s.signals), session.signals(&s.id));
            assert_eq!(s.progress, session.progress(&s.id));
        }
    }
}

#[test]
fn evaluation_is_deterministic() {
    let (cfg, layout) = setup();
    let eval = Evaluator::new(&cfg);
    assert_eq!(eval.eval_page(&layout, 2222.5), eval.eval_page(&layout, 2222.5));
}
