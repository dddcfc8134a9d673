//! CLI argument definitions for the tender reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tender_model::{HeaderStrategy, TableKind};

#[derive(Parser)]
#[command(
    name = "tender-recon",
    version,
    about = "Reconcile a pharmaceutical tender list against the product catalog",
    long_about = "Reconcile a pharmaceutical tender list against the product catalog.\n\n\
                  Locates the header row of the tender sheet, normalizes ingredient,\n\
                  strength and group codes, joins against the catalog and computes\n\
                  peer-group shares. Reads CSV and Excel/ODS workbooks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile a tender file and write the result tables.
    Reconcile(ReconcileArgs),

    /// Show header detection and column mapping for one file.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Tender file (.csv, .xlsx, .xls, .xlsb or .ods).
    #[arg(value_name = "TENDER")]
    pub tender: PathBuf,

    /// Product catalog file.
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: PathBuf,

    /// Active ingredient to therapeutic group reference.
    #[arg(long = "peer-groups", value_name = "FILE")]
    pub peer_groups: PathBuf,

    /// Hospital and account-owner reference; enables deployment suggestions.
    #[arg(long = "accounts", value_name = "FILE")]
    pub accounts: Option<PathBuf>,

    /// Output directory for generated files (default: <TENDER dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML file with reconciliation options.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of leading rows searched for the header (overrides config).
    #[arg(long = "scan-window", value_name = "N")]
    pub scan_window: Option<usize>,

    /// Header search strategy (overrides config).
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Factor applied to won quantities in deployment suggestions (overrides config).
    #[arg(long = "multiplier", value_name = "FACTOR")]
    pub multiplier: Option<f64>,

    /// Keep only tender rows for hospitals listed in the account reference.
    #[arg(long = "within-accounts", requires = "accounts")]
    pub within_accounts: bool,

    /// Narrow the account scope to one region (Miền); implies --within-accounts.
    #[arg(long = "region", value_name = "NAME", requires = "accounts")]
    pub region: Option<String>,

    /// Narrow the account scope to one area (Vùng); implies --within-accounts.
    #[arg(long = "area", value_name = "NAME", requires = "accounts")]
    pub area: Option<String>,

    /// Narrow the account scope to one province (Tỉnh); implies --within-accounts.
    #[arg(long = "province", value_name = "NAME", requires = "accounts")]
    pub province: Option<String>,

    /// Narrow the account scope to one hospital; implies --within-accounts.
    #[arg(long = "hospital", value_name = "NAME", requires = "accounts")]
    pub hospital: Option<String>,

    /// Reconcile and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// File to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Which table the file holds; selects header anchors and required columns.
    #[arg(long = "kind", value_enum, default_value = "tender")]
    pub kind: TableKindArg,

    /// Number of leading rows searched for the header.
    #[arg(long = "scan-window", value_name = "N")]
    pub scan_window: Option<usize>,

    /// Header search strategy.
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    EarlyExit,
    BestEffort,
}

impl From<StrategyArg> for HeaderStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::EarlyExit => HeaderStrategy::EarlyExit,
            StrategyArg::BestEffort => HeaderStrategy::BestEffort,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TableKindArg {
    Tender,
    Catalog,
    PeerGroups,
    Accounts,
}

impl From<TableKindArg> for TableKind {
    fn from(arg: TableKindArg) -> Self {
        match arg {
            TableKindArg::Tender => TableKind::Tender,
            TableKindArg::Catalog => TableKind::Catalog,
            TableKindArg::PeerGroups => TableKind::PeerGroups,
            TableKindArg::Accounts => TableKind::Accounts,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
