use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn linear_track_interpolates_between_stops() {
    let kf = Keyframes::linear([(0.0, 0.0), (10.0, 10.0)]).unwrap();
    assert!(approx(kf.sample(5.0), 5.0));
    assert_eq!(kf.sample(0.0), 0.0);
    assert_eq!(kf.sample(10.0), 10.0);
}

#[test]
fn inputs_outside_stops_clamp_to_edge_values() {
    let kf = Keyframes::linear([(0.5, 0.0), (1.0, 10.0)]).unwrap();
    assert_eq!(kf.sample(-4.0), 0.0);
    assert_eq!(kf.sample(0.25), 0.0);
    assert_eq!(kf.sample(1.5), 10.0);
    assert_eq!(kf.sample(f64::INFINITY), 10.0);
    assert_eq!(kf.sample(f64::NAN), 0.0);
}

#[test]
fn flat_segment_holds_its_value() {
    let kf = Keyframes::linear([(0.0, 1.0), (0.8, 1.0), (1.0, 0.0)]).unwrap();
    for x in [0.0, 0.1, 0.4, 0.79, 0.8] {
        assert_eq!(kf.sample(x), 1.0);
    }
    assert!(approx(kf.sample(0.9), 0.5));
}

#[test]
fn segment_ease_shapes_interpolation() {
    let kf = Keyframes::new(vec![
        Keyframe {
            at: 0.0,
            value: 0.0,
            ease: Ease::InQuad,
        },
        Keyframe::linear(1.0, 1.0),
    ])
    .unwrap();
    assert!(approx(kf.sample(0.5), 0.25));
}

#[test]
fn validation_rejects_empty_unsorted_and_non_finite() {
    assert!(Keyframes::<f64>::linear([]).is_err());
    assert!(Keyframes::linear([(0.5, 1.0), (0.5, 2.0)]).is_err());
    assert!(Keyframes::linear([(1.0, 1.0), (0.0, 2.0)]).is_err());
    assert!(Keyframes::linear([(0.0, 1.0), (f64::NAN, 2.0)]).is_err());
}

#[test]
fn deserialize_validates_stops() {
    let ok: Keyframes<f64> =
        serde_json::from_str(r#"[{"at":0.0,"value":1.0},{"at":1.0,"value":1.2}]"#).unwrap();
    assert_eq!(ok.keys().len(), 2);
    assert_eq!(ok.keys()[0].ease, Ease::Linear);

    let bad = serde_json::from_str::<Keyframes<f64>>(
        r#"[{"at":1.0,"value":1.0},{"at":0.0,"value":1.2}]"#,
    );
    assert!(bad.is_err());
}

#[test]
fn serialize_is_a_plain_stop_list() {
    let kf = Keyframes::linear([(0.0, 1.0), (1.0, 2.0)]).unwrap();
    let v = serde_json::to_value(&kf).unwrap();
    assert!(v.is_array());
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn color_lerp_rounds_channels() {
    let a = Rgba8Premul::from_straight_rgba(0, 0, 0, 255);
    let b = Rgba8Premul::from_straight_rgba(255, 255, 255, 255);
    let mid = Rgba8Premul::lerp(&a, &b, 0.5);
    assert_eq!(mid.r, 128);
    assert_eq!(mid.a, 255);
}
