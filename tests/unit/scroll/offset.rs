use super::*;

#[test]
fn parses_named_and_numeric_edges() {
    let i: Intersection = "end start".parse().unwrap();
    assert_eq!(i, Intersection::new(Edge::End, Edge::Start));

    let i: Intersection = "0.25 1".parse().unwrap();
    assert_eq!(i.target.fraction(), 0.25);
    assert_eq!(i.viewport.fraction(), 1.0);

    let i: Intersection = "center".parse().unwrap();
    assert_eq!(i, Intersection::new(Edge::Center, Edge::Center));
}

#[test]
fn rejects_garbage_and_extra_tokens() {
    assert!("".parse::<Intersection>().is_err());
    assert!("top bottom".parse::<Intersection>().is_err());
    assert!("start start start".parse::<Intersection>().is_err());
    assert!("inf start".parse::<Intersection>().is_err());
}

#[test]
fn default_offset_is_section_exit() {
    let o = ScrollOffset::default();
    assert_eq!(o, ScrollOffset::parse("start start", "end start").unwrap());
}

#[test]
fn offset_serializes_as_string_pair() {
    let v = serde_json::to_value(ScrollOffset::default()).unwrap();
    assert_eq!(v, serde_json::json!(["start start", "end start"]));

    let back: ScrollOffset = serde_json::from_value(v).unwrap();
    assert_eq!(back, ScrollOffset::SECTION_EXIT);

    assert!(serde_json::from_value::<ScrollOffset>(serde_json::json!(["start", "sideways"])).is_err());
}
