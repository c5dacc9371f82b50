use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PlacescapeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PlacescapeError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        PlacescapeError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        PlacescapeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PlacescapeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: PlacescapeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PlacescapeError::Serde(_)));
}
