//! Integration tests for the register data model.

use regctx_core::{
    BackingKind, ExecutionMode, RegisterCatalog, RegisterDescriptor, RegisterError, RegisterKind,
    RegisterValue, TargetCapabilities,
};

// ============================================================================
// Serialization round trips
// ============================================================================

#[test]
fn test_descriptor_serialization() {
    let desc = RegisterDescriptor::new(RegisterKind::Scalable(7));
    let serialized = serde_json::to_string(&desc).unwrap();
    let deserialized: RegisterDescriptor = serde_json::from_str(&serialized).unwrap();
    assert_eq!(desc, deserialized);
}

#[test]
fn test_error_serialization() {
    let err = RegisterError::WrongWidth {
        name: "z0".to_string(),
        expected: 32,
        got: 16,
    };
    let serialized = serde_json::to_string(&err).unwrap();
    let deserialized: RegisterError = serde_json::from_str(&serialized).unwrap();
    assert_eq!(err, deserialized);
}

#[test]
fn test_capabilities_serialization() {
    let caps = TargetCapabilities::sme2();
    let serialized = serde_json::to_string(&caps).unwrap();
    let deserialized: TargetCapabilities = serde_json::from_str(&serialized).unwrap();
    assert_eq!(caps, deserialized);
}

// ============================================================================
// Catalog and descriptor interplay
// ============================================================================

#[test]
fn test_widths_scale_with_vector_length() {
    let catalog = RegisterCatalog::new(TargetCapabilities::sme2());
    for svl_b in [16, 32, 64, 128, 256] {
        for (desc, _) in catalog.list_for_mode(ExecutionMode::Streaming) {
            assert!(desc.width_at(svl_b) > 0, "{} at svl {}", desc.name, svl_b);
        }
        let width = |name: &str| catalog.describe(name).unwrap().width_at(svl_b);
        assert_eq!(width("v0"), 16);
        assert_eq!(width("z0"), svl_b);
        assert_eq!(width("p0"), svl_b / 8);
        assert_eq!(width("za"), svl_b * svl_b);
        assert_eq!(width("zt0"), 2 * svl_b);
    }
}

#[test]
fn test_backing_table_matches_modes() {
    let catalog = RegisterCatalog::new(TargetCapabilities::sme2());
    let backing = |name: &str, mode| {
        catalog
            .describe(name)
            .unwrap()
            .backing_in(mode)
    };

    // Outside streaming mode.
    let mode = ExecutionMode::NonStreaming;
    assert_eq!(backing("v5", mode), BackingKind::Real);
    assert_eq!(backing("z5", mode), BackingKind::Overlay);
    assert_eq!(backing("p5", mode), BackingKind::Synthesized);
    assert_eq!(backing("ffr", mode), BackingKind::Synthesized);
    assert_eq!(backing("za", mode), BackingKind::Synthesized);
    assert_eq!(backing("zt0", mode), BackingKind::Synthesized);
    assert_eq!(backing("fpsr", mode), BackingKind::Real);
    assert_eq!(backing("svcr", mode), BackingKind::StatusDerived);

    // Inside streaming mode.
    let mode = ExecutionMode::Streaming;
    assert_eq!(backing("v5", mode), BackingKind::Overlay);
    assert_eq!(backing("z5", mode), BackingKind::Real);
    assert_eq!(backing("p5", mode), BackingKind::Real);
    assert_eq!(backing("ffr", mode), BackingKind::Real);
    assert_eq!(backing("za", mode), BackingKind::Real);
    assert_eq!(backing("zt0", mode), BackingKind::Real);
    assert_eq!(backing("fpcr", mode), BackingKind::Real);
    assert_eq!(backing("svg", mode), BackingKind::StatusDerived);
}

#[test]
fn test_value_literal_matches_console_syntax() {
    // The console accepts exactly what it prints.
    let value = RegisterValue::splat(0x12, 32);
    let reparsed: RegisterValue = value.to_vector_literal().parse().unwrap();
    assert_eq!(reparsed, value);

    let scalar = RegisterValue::from_u64_le(0xaaaaaaaa, 4);
    let reparsed = RegisterValue::parse_sized(&scalar.to_hex_scalar(), 4).unwrap();
    assert_eq!(reparsed, scalar);
}
