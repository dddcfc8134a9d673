//! Integration tests for the reconcile and inspect commands.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use tender_cli::cli::{InspectArgs, ReconcileArgs, StrategyArg, TableKindArg};
use tender_cli::commands::{
    DISPLAY_FILE, EXPORT_FILE, HOSPITAL_FILE, SUGGESTION_FILE, SUMMARY_FILE, VALUE_FILE,
    run_inspect, run_reconcile,
};
use tender_model::{CanonicalField, HeaderLocation, TableKind};

const TENDER_CSV: &str = "\
SỞ Y TẾ TỈNH X,,,,,
DANH MỤC THUỐC MỜI THẦU,,,,,
Bệnh viện/SYT,Tên hoạt chất,\"Nồng độ, hàm lượng\",Nhóm thuốc,Số lượng,Giá kế hoạch
BV A,Paracetamol (500mg),\"500 mg, 10 ml\",Nhóm 2,300,2000
BV A,Ibuprofen,400mg,Nhóm 3,100,1500
BV B,Vitamin C,1g,4,,500
";

const CATALOG_CSV: &str = "\
Tên sản phẩm,Hoạt chất,Nồng độ,Nhóm
Para-X,Paracetamol,\"500mg, 10ml\",2
Ibu-Y,Ibuprofen,400 mg,3
";

const GROUPS_CSV: &str = "\
Tên hoạt chất,Nhóm điều trị
Paracetamol,Giảm đau
Ibuprofen,Giảm đau
";

const ACCOUNTS_CSV: &str = "\
Miền,Bệnh viện/SYT,Tên sản phẩm,Tên hoạt chất,Địa bàn
Bắc,BV A,Para-X,Paracetamol,Hà Nội 1
Nam,BV C,Ibu-Y,Ibuprofen,Ko có địa bàn
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn reconcile_args(dir: &Path) -> ReconcileArgs {
    ReconcileArgs {
        tender: write(dir, "tender.csv", TENDER_CSV),
        catalog: write(dir, "catalog.csv", CATALOG_CSV),
        peer_groups: write(dir, "groups.csv", GROUPS_CSV),
        accounts: Some(write(dir, "accounts.csv", ACCOUNTS_CSV)),
        output_dir: Some(dir.join("out")),
        config: None,
        scan_window: None,
        strategy: None,
        multiplier: None,
        within_accounts: false,
        region: None,
        area: None,
        province: None,
        hospital: None,
        dry_run: false,
    }
}

#[test]
fn reconcile_writes_every_output() {
    let dir = TempDir::new().unwrap();
    let args = reconcile_args(dir.path());

    let run = run_reconcile(&args).unwrap();

    let out = dir.path().join("out");
    assert_eq!(run.output_dir.as_deref(), Some(out.as_path()));
    for name in [
        EXPORT_FILE,
        DISPLAY_FILE,
        VALUE_FILE,
        HOSPITAL_FILE,
        SUGGESTION_FILE,
        SUMMARY_FILE,
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
    assert_eq!(run.written.len(), 6);

    let export = fs::read_to_string(out.join(EXPORT_FILE)).unwrap();
    assert_eq!(export.lines().count(), 4);
    assert!(export.lines().next().unwrap().ends_with("PeerGroup,PeerGroupRatio"));
    let display = fs::read_to_string(out.join(DISPLAY_FILE)).unwrap();
    assert_eq!(display.lines().count(), 3);
    assert!(!display.contains("Vitamin C"));

    let suggestions = fs::read_to_string(out.join(SUGGESTION_FILE)).unwrap();
    assert_eq!(suggestions.lines().count(), 2);
    assert!(suggestions.contains("Para-X"));
    assert!(!suggestions.contains("Ibu-Y"));
}

#[test]
fn summary_json_carries_diagnostics() {
    let dir = TempDir::new().unwrap();
    let run = run_reconcile(&reconcile_args(dir.path())).unwrap();
    let summary_path = run.output_dir.unwrap().join(SUMMARY_FILE);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    let diagnostics = &summary["diagnostics"];
    assert_eq!(diagnostics["export_rows"], 3);
    assert_eq!(diagnostics["display_rows"], 2);
    assert_eq!(diagnostics["quantity_fallbacks"], 1);
    assert_eq!(diagnostics["header"]["Found"]["row_index"], 2);
    assert_eq!(summary["reference"]["catalog_entries"], 2);
    assert_eq!(summary["suggestions"], 1);
    assert_eq!(summary["options"]["header_strategy"], "best-effort");
    assert!(summary["generated_at"].is_string());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.dry_run = true;

    let run = run_reconcile(&args).unwrap();

    assert!(run.output_dir.is_none());
    assert!(run.written.is_empty());
    assert!(!dir.path().join("out").exists());
    assert_eq!(run.reconciliation.diagnostics().match_stats.matched, 2);
}

#[test]
fn config_file_is_overridden_by_flags() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.dry_run = true;
    args.config = Some(write(
        dir.path(),
        "options.toml",
        "header_scan_window = 2\nheader_strategy = \"early-exit\"\nsuggestion_multiplier = 2.0\n",
    ));

    // The tender header sits on row 2, outside a window of 2.
    let err = run_reconcile(&args).unwrap_err();
    assert!(format!("{err:#}").contains("could not find a header row"));

    args.scan_window = Some(5);
    let run = run_reconcile(&args).unwrap();
    assert_eq!(run.options.header_scan_window, 5);
    assert_eq!(run.options.suggestion_multiplier, 2.0);
    let suggestions = run.suggestions.unwrap();
    assert_eq!(suggestions[0].suggested_quantity, 600.0);
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.config = Some(write(dir.path(), "options.toml", "scan = 3\n"));
    let err = run_reconcile(&args).unwrap_err();
    assert!(format!("{err:#}").contains("load config"));
}

#[test]
fn missing_catalog_reports_path() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.catalog = dir.path().join("nope.csv");
    let err = run_reconcile(&args).unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn inspect_reports_header_and_mapping() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "tender.csv", TENDER_CSV);
    let report = run_inspect(&InspectArgs {
        file,
        kind: TableKindArg::Tender,
        scan_window: None,
        strategy: None,
    })
    .unwrap();

    assert_eq!(report.kind, TableKind::Tender);
    assert_eq!(report.grid_rows, 6);
    assert_eq!(report.location.row_index(), Some(2));
    assert!(report.missing.is_empty());
    let mapping = report.mapping.unwrap();
    assert_eq!(
        mapping.column_for(CanonicalField::Strength),
        Some("Nồng độ, hàm lượng")
    );
    assert_eq!(mapping.column_for(CanonicalField::Hospital), Some("Bệnh viện/SYT"));
}

#[test]
fn inspect_lists_missing_catalog_columns() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "catalog.csv",
        "Hoạt chất,Nồng độ\nParacetamol,500mg\n",
    );
    let report = run_inspect(&InspectArgs {
        file,
        kind: TableKindArg::Catalog,
        scan_window: None,
        strategy: Some(StrategyArg::EarlyExit),
    })
    .unwrap();

    assert!(matches!(report.location, HeaderLocation::Found(_)));
    assert_eq!(
        report.missing,
        vec![CanonicalField::DosageGroup, CanonicalField::ProductName]
    );
}

#[test]
fn region_scope_limits_outputs_to_its_hospitals() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.region = Some("bắc".to_string());

    let run = run_reconcile(&args).unwrap();
    let diagnostics = run.reconciliation.diagnostics();
    assert_eq!(diagnostics.scope_excluded, Some(1));
    assert_eq!(diagnostics.export_rows, 2);

    let out = run.output_dir.unwrap();
    let export = fs::read_to_string(out.join(EXPORT_FILE)).unwrap();
    assert_eq!(export.lines().count(), 3);
    assert!(!export.contains("BV B"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["scope"]["region"], "bắc");
    assert_eq!(summary["diagnostics"]["scope_excluded"], 1);
}

#[test]
fn scope_without_accounts_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut args = reconcile_args(dir.path());
    args.accounts = None;
    args.within_accounts = true;
    let err = run_reconcile(&args).unwrap_err();
    assert!(err.to_string().contains("--accounts"));
}
