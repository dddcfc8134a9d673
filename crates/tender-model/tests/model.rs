use std::collections::BTreeSet;

use tender_model::{
    CanonicalField, HeaderCandidate, HeaderLocation, HeaderStrategy, OptionsError,
    ReconcileOptions, TableKind,
};

#[test]
fn options_default_when_toml_is_empty() {
    let options = ReconcileOptions::from_toml_str("").expect("empty options");
    assert_eq!(options, ReconcileOptions::default());
    assert_eq!(options.header_scan_window, 20);
    assert_eq!(options.header_strategy, HeaderStrategy::BestEffort);
}

#[test]
fn options_parse_partial_toml() {
    let options = ReconcileOptions::from_toml_str(
        "header_scan_window = 10\nheader_strategy = \"early-exit\"\n",
    )
    .expect("parse options");
    assert_eq!(options.header_scan_window, 10);
    assert_eq!(options.header_strategy, HeaderStrategy::EarlyExit);
    assert!((options.suggestion_multiplier - 1.5).abs() < f64::EPSILON);
}

#[test]
fn options_reject_unknown_keys() {
    let err = ReconcileOptions::from_toml_str("scan = 3").unwrap_err();
    assert!(matches!(err, OptionsError::Parse(_)));
}

#[test]
fn options_reject_zero_window() {
    let err = ReconcileOptions::from_toml_str("header_scan_window = 0").unwrap_err();
    assert!(matches!(
        err,
        OptionsError::Invalid {
            field: "header_scan_window",
            ..
        }
    ));
}

#[test]
fn options_reject_negative_multiplier() {
    let err = ReconcileOptions::new()
        .with_suggestion_multiplier(-1.0)
        .validate()
        .unwrap_err();
    assert!(err.to_string().contains("suggestion_multiplier"));
}

#[test]
fn header_location_accessors() {
    let keywords: BTreeSet<String> = ["quantity".to_string()].into_iter().collect();
    let fallback = HeaderLocation::Fallback(HeaderCandidate::new(4, keywords));
    assert_eq!(fallback.row_index(), Some(4));
    assert!(fallback.is_fallback());
    assert_eq!(fallback.describe(), "row 4 (best effort, score 1)");
    assert_eq!(HeaderLocation::NotFound.row_index(), None);
}

#[test]
fn catalog_requires_product_name() {
    assert!(TableKind::Catalog
        .required_fields()
        .contains(&CanonicalField::ProductName));
    assert_eq!(
        TableKind::Tender.required_fields(),
        &[CanonicalField::ActiveIngredient, CanonicalField::Strength]
    );
}

#[test]
fn reconciled_row_serializes() {
    let row = tender_model::ReconciledRow::new(
        tender_model::TenderRow {
            origin_index: 3,
            cells: vec![],
            active_ingredient: "Paracetamol".to_string(),
            strength: "500mg".to_string(),
            dosage_group: "2".to_string(),
            route: None,
            hospital: None,
            quantity: 10.0,
            unit_price: 2.0,
            key_active: "paracetamol".to_string(),
            key_strength: "500mg".to_string(),
            key_group: "2".to_string(),
        },
        None,
    );
    let json = serde_json::to_value(&row).expect("serialize row");
    assert_eq!(json["product_name"], serde_json::Value::Null);
    assert_eq!(json["tender"]["origin_index"], 3);
    assert!((row.value() - 20.0).abs() < f64::EPSILON);
}
