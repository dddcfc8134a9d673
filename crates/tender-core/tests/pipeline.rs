//! End-to-end reconciliation over literal grids.

use tender_core::{
    AccountScope, ReferenceCache, ReferenceData, SourceId, format_amount, format_ratio, reconcile,
    reconcile_with_scope,
};
use tender_model::{
    CanonicalField, HeaderLocation, RawGrid, ReconcileError, ReconcileOptions, TableKind,
};

fn tender_grid() -> RawGrid {
    RawGrid::from_text_rows(vec![
        vec!["SỞ Y TẾ TỈNH X", "", "", "", "", "", ""],
        vec!["DANH MỤC THUỐC MỜI THẦU", "", "", "", "", "", ""],
        vec!["", "", "", "", "", "", ""],
        vec![
            "Bệnh viện/SYT",
            "Tên hoạt chất",
            "Nồng độ, hàm lượng",
            "Nhóm thuốc",
            "Số lượng",
            "Giá kế hoạch",
            "Ghi chú",
        ],
        vec!["BV A", "Paracetamol (500mg)", "500 mg, 10 ml", "Nhóm 2", "300", "2.000", ""],
        vec!["BV A", "Ibuprofen", "400mg", "Nhóm 3", "100", "1500", ""],
        vec!["BV B", "Paracetamol", "500mg/10ml", "2", "100", "2000", "gấp"],
        vec!["BV B", "Vitamin C", "1g", "4", "", "500", ""],
    ])
}

fn catalog_grid() -> RawGrid {
    RawGrid::from_text_rows(vec![
        vec!["Tên sản phẩm", "Hoạt chất", "Nồng độ", "Nhóm"],
        vec!["Para-X", "Paracetamol", "500mg, 10ml", "2"],
        vec!["Para-Z", "Paracetamol", "500 mg, 10 ml", "Nhóm 2"],
        vec!["Ibu-Y", "Ibuprofen", "400 mg", "3"],
    ])
}

fn peer_group_grid() -> RawGrid {
    RawGrid::from_text_rows(vec![
        vec!["Tên hoạt chất", "Nhóm điều trị"],
        vec!["Paracetamol", "Giảm đau"],
        vec!["Ibuprofen", "Giảm đau"],
    ])
}

fn account_grid() -> RawGrid {
    RawGrid::from_text_rows(vec![
        vec!["Miền", "Bệnh viện/SYT", "Tên sản phẩm", "Tên hoạt chất", "Địa bàn"],
        vec!["Bắc", "BV A", "Para-X", "Paracetamol", "Hà Nội 1"],
        vec!["Bắc", "BV C", "Ibu-Y", "Ibuprofen", "Tạm ngưng triển khai"],
        vec!["Nam", "BV D", "Para-X", "Paracetamol", "HCM 2"],
    ])
}

fn reference() -> ReferenceData {
    ReferenceData::from_grids(
        &catalog_grid(),
        &peer_group_grid(),
        Some(&account_grid()),
        &ReconcileOptions::default(),
    )
    .unwrap()
}

#[test]
fn paracetamol_matches_first_catalog_product() {
    let result = reconcile(&tender_grid(), &reference(), &ReconcileOptions::default()).unwrap();

    let diagnostics = result.diagnostics();
    assert!(matches!(diagnostics.header, HeaderLocation::Found(ref c) if c.row_index == 3));
    assert_eq!(diagnostics.tender_rows, 4);
    assert_eq!(diagnostics.export_rows, 4);
    assert_eq!(diagnostics.display_rows, 3);
    assert_eq!(diagnostics.match_stats.duplicates_dropped, 2);
    assert_eq!(diagnostics.quantity_fallbacks, 1);
    assert_eq!(diagnostics.unmapped_columns, vec!["Ghi chú".to_string()]);

    let first = &result.export_rows()[0];
    assert_eq!(first.origin_index(), 4);
    assert_eq!(first.tender.key(), ("paracetamol", "500mg/10ml", "2"));
    assert_eq!(first.product_name.as_deref(), Some("Para-X"));
    assert_eq!(first.region.as_deref(), Some("Bắc"));
    assert_eq!(first.account_owner.as_deref(), Some("Hà Nội 1"));
    assert_eq!(first.tender.unit_price, 2000.0);
}

#[test]
fn unmatched_rows_are_exported_but_not_displayed() {
    let result = reconcile(&tender_grid(), &reference(), &ReconcileOptions::default()).unwrap();
    let vitamin = result
        .export_rows()
        .iter()
        .find(|row| row.tender.key_active == "vitamin c")
        .unwrap();
    assert!(vitamin.product_name.is_none());
    assert!(result.display_rows().all(|row| row.tender.key_active != "vitamin c"));

    let export = result.export_frame().unwrap();
    let display = result.display_frame().unwrap();
    assert_eq!(export.height(), 4);
    assert_eq!(display.height(), 3);
    assert_eq!(export.width(), result.columns().len() + 5);
    assert_eq!(
        export.get_column_names().last().map(|name| name.as_str()),
        Some("PeerGroupRatio")
    );
}

#[test]
fn peer_group_ratio_uses_full_export_set() {
    let result = reconcile(&tender_grid(), &reference(), &ReconcileOptions::default()).unwrap();
    let rows = result.export_rows();
    // Giảm đau total = 300 + 100 + 100
    assert_eq!(rows[0].peer_group.as_deref(), Some("Giảm đau"));
    assert_eq!(rows[0].peer_group_ratio, Some(0.6));
    assert_eq!(rows[1].peer_group_ratio, Some(0.2));
    assert_eq!(format_ratio(rows[2].peer_group_ratio.unwrap()), "20.00%");
    assert_eq!(rows[3].peer_group, None);
    assert_eq!(rows[3].peer_group_ratio, None);
}

#[test]
fn reports_follow_display_and_export_views() {
    let reference = reference();
    let result = reconcile(&tender_grid(), &reference, &ReconcileOptions::default()).unwrap();

    let values = result.value_by_ingredient();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].key_active, "paracetamol");
    assert_eq!(values[0].value, 800_000.0);
    assert_eq!(format_amount(values[0].value), "800.00 nghìn");
    assert_eq!(values[1].value, 150_000.0);

    let summary = result.hospital_summary();
    let hospitals: Vec<(&str, &str)> = summary
        .iter()
        .map(|s| (s.hospital.as_str(), s.active_ingredient.as_str()))
        .collect();
    assert_eq!(
        hospitals,
        vec![
            ("BV A", "Ibuprofen"),
            ("BV A", "Paracetamol (500mg)"),
            ("BV B", "Paracetamol"),
            ("BV B", "Vitamin C"),
        ]
    );

    let suggestions = result.deployment_suggestions(&reference, 1.5);
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.product_name == "Para-X"));
    assert_eq!(suggestions[0].won_quantity, 400.0);
    assert_eq!(suggestions[0].suggested_quantity, 600.0);
    assert_eq!(
        suggestions[0].reason,
        "Nhóm Giảm đau thường sử dụng; sản phẩm mới, hiệu quả tốt hơn."
    );

    let rounded = result.deployment_suggestions(&reference, 1.001);
    assert_eq!(rounded[0].suggested_quantity, 401.0);
}

#[test]
fn missing_header_is_terminal() {
    let grid = RawGrid::from_text_rows(vec![vec!["a", "b"], vec!["1", "2"]]);
    let err = reconcile(&grid, &reference(), &ReconcileOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::HeaderNotFound {
            table: TableKind::Tender,
            scanned: 2,
        }
    );
}

#[test]
fn missing_strength_column_is_terminal() {
    let grid = RawGrid::from_text_rows(vec![
        vec!["Hoạt chất", "Số lượng"],
        vec!["Paracetamol", "10"],
    ]);
    let err = reconcile(&grid, &reference(), &ReconcileOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::MissingRequiredColumn {
            table: TableKind::Tender,
            fields: vec![CanonicalField::Strength],
        }
    );
    assert_eq!(
        err.to_string(),
        "tender table is missing required columns: Strength"
    );
}

#[test]
fn header_only_tender_yields_empty_result() {
    let grid = RawGrid::from_text_rows(vec![vec!["Hoạt chất", "Nồng độ", "Số lượng"]]);
    let result = reconcile(&grid, &reference(), &ReconcileOptions::default()).unwrap();
    assert!(result.export_rows().is_empty());
    assert_eq!(result.export_frame().unwrap().height(), 0);
}

#[test]
fn reference_cache_shares_loaded_data() {
    let cache = ReferenceCache::new();
    let id = SourceId::from_parts([Some(&b"catalog"[..]), Some(&b"groups"[..]), None]);
    let first = cache
        .get_or_try_insert_with(id.clone(), || {
            ReferenceData::from_grids(
                &catalog_grid(),
                &peer_group_grid(),
                None,
                &ReconcileOptions::default(),
            )
        })
        .unwrap();
    let again = cache.get(&id).unwrap();
    assert_eq!(first.catalog.len(), 3);
    assert!(!first.has_accounts());
    assert!(std::sync::Arc::ptr_eq(&first, &again));
}

fn territory_reference() -> ReferenceData {
    let accounts = RawGrid::from_text_rows(vec![
        vec![
            "Miền",
            "Vùng",
            "Tỉnh",
            "Bệnh viện/SYT",
            "Tên sản phẩm",
            "Tên hoạt chất",
            "Địa bàn",
        ],
        vec!["Bắc", "Đồng bằng", "Hà Nội", "BV A", "Para-X", "Paracetamol", "Hà Nội 1"],
        vec!["Nam", "Đông Nam Bộ", "TP HCM", "BV B", "Ibu-Y", "Ibuprofen", "HCM 2"],
    ]);
    ReferenceData::from_grids(
        &catalog_grid(),
        &peer_group_grid(),
        Some(&accounts),
        &ReconcileOptions::default(),
    )
    .unwrap()
}

#[test]
fn unscoped_run_keeps_every_hospital() {
    let result = reconcile(&tender_grid(), &territory_reference(), &ReconcileOptions::default())
        .unwrap();
    assert_eq!(result.diagnostics().scope_excluded, None);
    assert_eq!(result.export_rows().len(), 4);
}

#[test]
fn region_scope_keeps_only_its_hospitals() {
    let scope = AccountScope::all().with_region("bac");
    let result = reconcile_with_scope(
        &tender_grid(),
        &territory_reference(),
        &ReconcileOptions::default(),
        Some(&scope),
    )
    .unwrap();

    let diagnostics = result.diagnostics();
    assert_eq!(diagnostics.tender_rows, 4);
    assert_eq!(diagnostics.scope_excluded, Some(2));
    assert_eq!(diagnostics.export_rows, 2);
    assert!(
        result
            .export_rows()
            .iter()
            .all(|row| row.tender.hospital.as_deref() == Some("BV A"))
    );

    // Peer-group totals cover the kept rows only: 300 + 100.
    let rows = result.export_rows();
    assert_eq!(rows[0].peer_group_ratio, Some(0.75));
    assert_eq!(rows[1].peer_group_ratio, Some(0.25));
}

#[test]
fn area_scope_matches_folded_names() {
    let scope = AccountScope::all().with_area("ĐÔNG NAM BỘ");
    let result = reconcile_with_scope(
        &tender_grid(),
        &territory_reference(),
        &ReconcileOptions::default(),
        Some(&scope),
    )
    .unwrap();
    let keys: Vec<&str> = result
        .export_rows()
        .iter()
        .map(|row| row.tender.key_active.as_str())
        .collect();
    assert_eq!(keys, vec!["paracetamol", "vitamin c"]);
    assert_eq!(result.diagnostics().display_rows, 1);
}

#[test]
fn unrestricted_scope_keeps_hospitals_listed_in_accounts() {
    // The default account reference lists BV A, BV C and BV D.
    let result = reconcile_with_scope(
        &tender_grid(),
        &reference(),
        &ReconcileOptions::default(),
        Some(&AccountScope::all()),
    )
    .unwrap();
    assert_eq!(result.diagnostics().scope_excluded, Some(2));
    assert_eq!(result.export_rows().len(), 2);
}

#[test]
fn scope_without_accounts_keeps_nothing() {
    let reference = ReferenceData::from_grids(
        &catalog_grid(),
        &peer_group_grid(),
        None,
        &ReconcileOptions::default(),
    )
    .unwrap();
    let result = reconcile_with_scope(
        &tender_grid(),
        &reference,
        &ReconcileOptions::default(),
        Some(&AccountScope::all()),
    )
    .unwrap();
    assert!(result.export_rows().is_empty());
    assert_eq!(result.diagnostics().scope_excluded, Some(4));
}
