use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn at(p: f64) -> VisualSignals {
    SignalPolicy::default().signals_at(ScrollProgress::new(p))
}

#[test]
fn boundary_table_matches_exact_tuples() {
    let table = [
        (0.0, 1.0, 1.0, 0.0),
        (0.5, 1.0, 1.1, 0.0),
        (0.75, 1.0, 1.15, 5.0),
        (0.8, 1.0, 1.16, 6.0),
        (0.9, 0.5, 1.18, 8.0),
        (1.0, 0.0, 1.2, 10.0),
    ];
    for (p, opacity, scale, blur) in table {
        let s = at(p);
        assert!(approx(s.opacity, opacity), "opacity({p}) = {}", s.opacity);
        assert!(approx(s.scale, scale), "scale({p}) = {}", s.scale);
        assert!(approx(s.blur_px, blur), "blur({p}) = {}", s.blur_px);
    }
}

#[test]
fn window_edges_are_exact() {
    assert_eq!(at(0.0), VisualSignals::INITIAL);
    let end = at(1.0);
    assert_eq!(end.opacity, 0.0);
    assert_eq!(end.scale, 1.2);
    assert_eq!(end.blur_px, 10.0);
}

#[test]
fn opacity_is_flat_then_falls() {
    for i in 0..=80 {
        assert_eq!(at(f64::from(i) / 100.0).opacity, 1.0);
    }
    let mut prev = 1.0;
    for i in 80..=100 {
        let o = at(f64::from(i) / 100.0).opacity;
        assert!(o <= prev);
        prev = o;
    }
}

#[test]
fn scale_and_blur_follow_closed_forms() {
    for i in 0..=100 {
        let p = f64::from(i) / 100.0;
        let s = at(p);
        assert!(approx(s.scale, 1.0 + 0.2 * p));
        let blur = if p <= 0.5 { 0.0 } else { 20.0 * (p - 0.5) };
        assert!(approx(s.blur_px, blur));
    }
}

#[test]
fn scale_and_blur_are_non_decreasing() {
    let mut prev = at(0.0);
    for i in 1..=200 {
        let s = at(f64::from(i) / 200.0);
        assert!(s.scale >= prev.scale);
        assert!(s.blur_px >= prev.blur_px);
        prev = s;
    }
}

#[test]
fn mapping_is_idempotent() {
    let policy = SignalPolicy::default();
    for p in [0.0, 0.33, 0.5, 0.8, 0.97, 1.0] {
        let a = policy.signals_at(ScrollProgress::new(p));
        let b = policy.signals_at(ScrollProgress::new(p));
        assert_eq!(a, b);
    }
}

#[test]
fn out_of_range_progress_clamps() {
    assert_eq!(at(-2.0), at(0.0));
    assert_eq!(at(3.5), at(1.0));
}

#[test]
fn unmounted_container_keeps_initial_signals() {
    let t = ScrollTransformer::new(ScrollOffset::default(), Arc::new(SignalPolicy::default()));
    let vp = Viewport::new(800, 600).unwrap();
    let (progress, signals) = t.evaluate(ContainerGeometry::new(100.0, 0.0), vp, 5_000.0);
    assert!(progress.is_none());
    assert_eq!(signals, VisualSignals::INITIAL);
}

#[test]
fn transformer_observes_its_own_container() {
    let t = ScrollTransformer::new(ScrollOffset::default(), Arc::new(SignalPolicy::default()));
    let vp = Viewport::new(800, 600).unwrap();
    let c = ContainerGeometry::new(600.0, 900.0);
    let (progress, signals) = t.evaluate(c, vp, 600.0 + 0.8 * 900.0);
    assert!(approx(progress.unwrap().value(), 0.8));
    assert!(approx(signals.scale, 1.16));
    assert!(approx(signals.blur_px, 6.0));
}

#[test]
fn css_filter_omits_zero_blur() {
    assert_eq!(VisualSignals::INITIAL.css_filter(), "none");
    assert_eq!(at(1.0).css_filter(), "blur(10px)");
}

#[test]
fn css_filter_rounds_interpolated_blur() {
    let signals = VisualSignals {
        blur_px: 0.1 + 0.2,
        ..VisualSignals::INITIAL
    };
    assert_eq!(signals.css_filter(), "blur(0.3px)");
    assert_eq!(at(0.9).css_filter(), "blur(8px)");
}

#[test]
fn breakpoints_are_the_union_of_track_stops() {
    assert_eq!(SignalPolicy::default().breakpoints(), vec![0.0, 0.5, 0.8, 1.0]);
}

#[test]
fn validate_rejects_out_of_range_values() {
    assert!(SignalPolicy::default().validate().is_ok());

    let mut p = SignalPolicy::default();
    p.opacity = Keyframes::linear([(0.0, 1.5), (1.0, 0.0)]).unwrap();
    assert!(p.validate().is_err());

    let mut p = SignalPolicy::default();
    p.blur_px = Keyframes::linear([(0.0, 0.0), (2.0, 10.0)]).unwrap();
    assert!(p.validate().is_err());

    let mut p = SignalPolicy::default();
    p.scale = Keyframes::constant(0.0);
    assert!(p.validate().is_err());
}

#[test]
fn policy_roundtrips_through_json_config() {
    let json = serde_json::to_string(&SignalPolicy::default()).unwrap();
    let back: SignalPolicy = serde_json::from_str(&json).unwrap();
    assert_eq!(back, SignalPolicy::default());
}
