use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use tender_core::{
    AccountScope, DeploymentSuggestion, Diagnostics, Reconciliation, ReferenceCache,
    ReferenceData, SourceId, hospital_summary_frame, ingredient_value_frame,
    reconcile_with_scope, suggestion_frame,
};
use tender_ingest::{
    HeaderLocator, SourceFormat, promote_header, read_grid, read_grid_bytes, read_source_bytes,
};
use tender_map::ColumnMapper;
use tender_model::{
    CanonicalField, ColumnMapping, HeaderLocation, RawGrid, ReconcileOptions, TableKind,
};

use crate::cli::{InspectArgs, ReconcileArgs, StrategyArg};

pub const EXPORT_FILE: &str = "export.csv";
pub const DISPLAY_FILE: &str = "display.csv";
pub const VALUE_FILE: &str = "value_by_ingredient.csv";
pub const HOSPITAL_FILE: &str = "hospital_summary.csv";
pub const SUGGESTION_FILE: &str = "suggestions.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything a `reconcile` invocation produced.
#[derive(Debug)]
pub struct ReconcileRun {
    pub tender: PathBuf,
    pub options: ReconcileOptions,
    pub scope: Option<AccountScope>,
    pub reference: Arc<ReferenceData>,
    pub reconciliation: Reconciliation,
    pub suggestions: Option<Vec<DeploymentSuggestion>>,
    /// Directory the outputs went to; `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub written: Vec<PathBuf>,
}

/// Header and mapping diagnostics for a single file.
#[derive(Debug)]
pub struct InspectReport {
    pub file: PathBuf,
    pub kind: TableKind,
    pub grid_rows: usize,
    pub scanned: usize,
    pub location: HeaderLocation,
    pub columns: Vec<String>,
    pub mapping: Option<ColumnMapping>,
    pub missing: Vec<CanonicalField>,
}

#[derive(Serialize)]
struct ReferenceCounts {
    catalog_entries: usize,
    peer_groups: usize,
    accounts: usize,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    tender: String,
    options: &'a ReconcileOptions,
    scope: Option<&'a AccountScope>,
    reference: ReferenceCounts,
    diagnostics: &'a Diagnostics,
    suggestions: Option<usize>,
    outputs: Vec<String>,
}

/// Base options from `--config`, then the command-line overrides.
fn resolve_options(
    config: Option<&Path>,
    scan_window: Option<usize>,
    strategy: Option<StrategyArg>,
    multiplier: Option<f64>,
) -> Result<ReconcileOptions> {
    let mut options = match config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            ReconcileOptions::from_toml_str(&content)
                .with_context(|| format!("load config {}", path.display()))?
        }
        None => ReconcileOptions::default(),
    };
    if let Some(window) = scan_window {
        options = options.with_header_scan_window(window);
    }
    if let Some(strategy) = strategy {
        options = options.with_header_strategy(strategy.into());
    }
    if let Some(multiplier) = multiplier {
        options = options.with_suggestion_multiplier(multiplier);
    }
    options.validate().context("invalid options")?;
    Ok(options)
}

/// The account scope requested on the command line, if any.
fn account_scope(args: &ReconcileArgs) -> Option<AccountScope> {
    let narrowed = args.region.is_some()
        || args.area.is_some()
        || args.province.is_some()
        || args.hospital.is_some();
    (args.within_accounts || narrowed).then(|| AccountScope {
        region: args.region.clone(),
        area: args.area.clone(),
        province: args.province.clone(),
        hospital: args.hospital.clone(),
    })
}

fn read_reference_grid(path: &Path, bytes: &[u8]) -> Result<RawGrid> {
    let format = SourceFormat::from_path(path)?;
    read_grid_bytes(bytes, format).with_context(|| format!("read {}", path.display()))
}

/// Loads reference data through the process-wide cache.
///
/// The cache key covers the bytes of every reference file and the header
/// options, since both decide what gets parsed.
fn load_reference(args: &ReconcileArgs, options: &ReconcileOptions) -> Result<Arc<ReferenceData>> {
    let catalog_bytes = read_source_bytes(&args.catalog)?;
    let group_bytes = read_source_bytes(&args.peer_groups)?;
    let account_bytes = args
        .accounts
        .as_deref()
        .map(read_source_bytes)
        .transpose()?;
    let option_key = format!(
        "{}|{:?}",
        options.header_scan_window, options.header_strategy
    );

    let id = SourceId::from_parts([
        Some(catalog_bytes.as_slice()),
        Some(group_bytes.as_slice()),
        account_bytes.as_deref(),
        Some(option_key.as_bytes()),
    ]);
    debug!(source = %id, "reference source id");

    ReferenceCache::global().get_or_try_insert_with(id, || -> Result<ReferenceData> {
        let catalog = read_reference_grid(&args.catalog, &catalog_bytes)?;
        let groups = read_reference_grid(&args.peer_groups, &group_bytes)?;
        let accounts = match (args.accounts.as_deref(), account_bytes.as_deref()) {
            (Some(path), Some(bytes)) => Some(read_reference_grid(path, bytes)?),
            _ => None,
        };
        ReferenceData::from_grids(&catalog, &groups, accounts.as_ref(), options)
            .context("load reference data")
    })
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<ReconcileRun> {
    let span = info_span!("reconcile_command", tender = %args.tender.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = resolve_options(
        args.config.as_deref(),
        args.scan_window,
        args.strategy,
        args.multiplier,
    )?;
    let tender = read_grid(&args.tender)
        .with_context(|| format!("read tender {}", args.tender.display()))?;
    let scope = account_scope(args);
    if scope.is_some() && args.accounts.is_none() {
        bail!("an account scope needs --accounts");
    }
    let reference = load_reference(args, &options)?;
    let reconciliation = reconcile_with_scope(&tender, &reference, &options, scope.as_ref())
        .with_context(|| format!("reconcile {}", args.tender.display()))?;

    if reconciliation.diagnostics().header.is_fallback() {
        warn!("tender header located by best-effort scoring; check the mapping below");
    }

    let suggestions = reference.has_accounts().then(|| {
        reconciliation.deployment_suggestions(&reference, options.suggestion_multiplier)
    });

    let mut run = ReconcileRun {
        tender: args.tender.clone(),
        options,
        scope,
        reference,
        reconciliation,
        suggestions,
        output_dir: None,
        written: Vec::new(),
    };

    if args.dry_run {
        info!("dry run, no files written");
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.tender));
        run.written = write_outputs(&run, &output_dir)?;
        run.output_dir = Some(output_dir);
    }

    debug!(duration_ms = start.elapsed().as_millis(), "reconcile command timing");
    Ok(run)
}

fn default_output_dir(tender: &Path) -> PathBuf {
    tender
        .parent()
        .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output"))
}

fn write_outputs(run: &ReconcileRun, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let span = info_span!("output", dir = %output_dir.display());
    let _guard = span.enter();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;

    let reconciliation = &run.reconciliation;
    let mut frames: Vec<(&str, DataFrame)> = vec![
        (EXPORT_FILE, reconciliation.export_frame()?),
        (DISPLAY_FILE, reconciliation.display_frame()?),
        (
            VALUE_FILE,
            ingredient_value_frame(&reconciliation.value_by_ingredient())?,
        ),
        (
            HOSPITAL_FILE,
            hospital_summary_frame(&reconciliation.hospital_summary())?,
        ),
    ];
    if let Some(suggestions) = &run.suggestions {
        frames.push((SUGGESTION_FILE, suggestion_frame(suggestions)?));
    }

    let mut written = Vec::with_capacity(frames.len() + 1);
    for (name, mut frame) in frames {
        let path = output_dir.join(name);
        write_csv(&path, &mut frame)?;
        debug!(path = %path.display(), rows = frame.height(), "wrote table");
        written.push(path);
    }

    let summary_path = output_dir.join(SUMMARY_FILE);
    write_summary(&summary_path, run, &written)?;
    written.push(summary_path);

    info!(files = written.len(), "outputs written");
    Ok(written)
}

fn write_csv(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn write_summary(path: &Path, run: &ReconcileRun, written: &[PathBuf]) -> Result<()> {
    let summary = RunSummary {
        generated_at: Utc::now().to_rfc3339(),
        tender: run.tender.display().to_string(),
        options: &run.options,
        scope: run.scope.as_ref(),
        reference: ReferenceCounts {
            catalog_entries: run.reference.catalog.len(),
            peer_groups: run.reference.peer_groups.len(),
            accounts: run.reference.accounts.len(),
        },
        diagnostics: run.reconciliation.diagnostics(),
        suggestions: run.suggestions.as_ref().map(Vec::len),
        outputs: written
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect(),
    };
    let json = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectReport> {
    let kind = TableKind::from(args.kind);
    let span = info_span!("inspect", file = %args.file.display(), table = %kind);
    let _guard = span.enter();

    let options = resolve_options(None, args.scan_window, args.strategy, None)?;
    let grid = read_grid(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;

    let locator = HeaderLocator::for_table(kind, &options);
    let location = locator.locate(&grid);
    let mut report = InspectReport {
        file: args.file.clone(),
        kind,
        grid_rows: grid.len(),
        scanned: locator.scan_len(&grid),
        location,
        columns: Vec::new(),
        mapping: None,
        missing: Vec::new(),
    };

    if let Some(row_index) = report.location.row_index() {
        let table = promote_header(&grid, row_index);
        let mapping = ColumnMapper::new().map(&table.columns);
        report.missing = kind
            .required_fields()
            .iter()
            .copied()
            .filter(|field| !mapping.has(*field))
            .collect();
        report.columns = table.columns;
        report.mapping = Some(mapping);
    }
    Ok(report)
}
