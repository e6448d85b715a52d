use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChoreoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ChoreoError::timeline("x")
            .to_string()
            .contains("timeline error:")
    );
    assert!(ChoreoError::layout("x").to_string().contains("layout error:"));
    assert!(ChoreoError::asset("x").to_string().contains("asset error:"));
    assert!(
        ChoreoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChoreoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: ChoreoError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ChoreoError::Serde(_)));
}
