//! Codebase inventory scanner.
//!
//! This binary walks a project tree, classifies each file, detects data
//! connector usage through configurable keyword and regex patterns,
//! extracts referenced SQL objects and Python imports, and writes a
//! structured JSON report. Individual file failures never abort a scan;
//! they are recorded per file in the report.

use clap::{Args, Parser, Subcommand};
use datascout_core::{PatternSet, Result, init_logging};
use datascout_cli::{output, provider::ProviderConfig, scan};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "datascout")]
#[command(about = "Codebase inventory and connector detection tool")]
#[command(version)]
#[command(long_about = "
Datascout - Data engineering codebase inventory

This tool scans a project directory and extracts metadata including:
- File type classification (Python, SQL, notebooks, config)
- Data connector usage (databases, warehouses, storage, messaging)
- Referenced SQL tables and views
- Python import usage

EXAMPLES:
  datascout --project-path ./my-etl-repo
  datascout --project-path . --output reports/inventory.json --print-summary
  datascout --project-path . --patterns custom_patterns.yaml --jobs 4
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Project directory to scan
    #[arg(long, help = "Path to the project directory to analyze")]
    pub project_path: Option<PathBuf>,

    /// Output file path
    #[arg(
        short,
        long,
        default_value = "metadata_report.json",
        help = "Output file path for the JSON report"
    )]
    pub output: PathBuf,

    /// Pattern document path
    #[arg(long, help = "Custom connector pattern document (YAML)")]
    pub patterns: Option<PathBuf>,

    /// Additional excluded directories
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated directory names to exclude from traversal"
    )]
    pub exclude_dir: Vec<String>,

    /// Worker threads
    #[arg(
        long,
        default_value = "1",
        help = "Number of worker threads for file analysis"
    )]
    pub jobs: usize,

    /// Print a human-readable summary
    #[arg(long, help = "Print a human-readable summary after the scan")]
    pub print_summary: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a project directory
    Scan(ScanArgs),
    /// Show the loaded connector patterns
    Patterns,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Project directory to scan
    #[arg(help = "Path to the project directory")]
    pub project_path: PathBuf,

    /// Output file path
    #[arg(short, long, help = "Output file path for the JSON report")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Scan failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let patterns = load_patterns(cli)?;

    match &cli.command {
        Some(Command::Scan(args)) => {
            let output = args.output.clone().unwrap_or_else(|| cli.output.clone());
            scan_project(&args.project_path, &output, &patterns, cli)
        }
        Some(Command::Patterns) => {
            list_patterns(&patterns);
            Ok(())
        }
        None => {
            if let Some(ref project_path) = cli.project_path {
                scan_project(project_path, &cli.output, &patterns, cli)
            } else {
                eprintln!("Error: A project path is required");
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
        }
    }
}

fn load_patterns(cli: &Cli) -> Result<PatternSet> {
    match &cli.patterns {
        Some(path) => PatternSet::load_from_path(path),
        None => PatternSet::load_default(),
    }
}

fn scan_project(
    project_path: &std::path::Path,
    output_path: &std::path::Path,
    patterns: &PatternSet,
    cli: &Cli,
) -> Result<()> {
    let options = scan::ScanOptions {
        provider: ProviderConfig::new().with_excluded_dirs(cli.exclude_dir.iter().cloned()),
        jobs: cli.jobs.max(1),
    };

    let report = scan::run_scan(project_path, patterns, &options)?;

    info!(
        "Analyzed {} files ({} with errors) in {} ms",
        report.project_statistics.total_files,
        report.project_statistics.files_with_errors,
        report.scan_metadata.duration_ms
    );

    output::write_report(&report, output_path)?;

    if cli.print_summary {
        println!("{}", output::render_summary(&report));
    }

    info!("Analysis complete, results saved to {}", output_path.display());
    Ok(())
}

fn list_patterns(patterns: &PatternSet) {
    println!("Pattern document version: {}", patterns.version());
    println!("Connectors ({}):", patterns.connectors().len());
    for (name, connector) in patterns.connectors() {
        println!(
            "  {} ({}): {} keywords, {} regex patterns",
            name,
            connector.connector_type,
            connector.keywords.len(),
            connector.patterns.len()
        );
    }
}
