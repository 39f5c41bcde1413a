//! Scan orchestration: enumerate, analyze, aggregate.

use std::path::Path;
use std::time::Instant;

use datascout_core::models::{ScanMetadata, ScanReport};
use datascout_core::{Analyzer, DataScoutError, PatternSet, ReportBuilder, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::provider::{self, ProviderConfig, SourceFile};

/// Scan parameters resolved from the command line.
#[derive(Debug)]
pub struct ScanOptions {
    pub provider: ProviderConfig,
    /// Worker threads for per-file analysis. 1 means sequential.
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::new(),
            jobs: 1,
        }
    }
}

/// Runs a full scan of `root` and returns the assembled report.
///
/// Per-file failures are folded into the report as error markers; only
/// configuration problems (bad root, bad pattern document) are fatal.
pub fn run_scan(root: &Path, patterns: &PatternSet, options: &ScanOptions) -> Result<ScanReport> {
    let started = Instant::now();
    let resolved = provider::resolve_root(root)?;

    info!("Scanning project at {}", resolved.display());
    let files = provider::enumerate(&resolved, &options.provider)?;
    info!("Found {} files to analyze", files.len());

    let analyzer = Analyzer::new(patterns);
    let records = analyze_all(&analyzer, files, options.jobs)?;

    let mut builder = ReportBuilder::new(patterns);
    for record in records {
        builder.add(record);
    }

    let mut metadata = ScanMetadata::new(
        resolved.to_string_lossy().to_string(),
        provider::project_name(&resolved),
        patterns.version(),
    );
    metadata.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(builder.finish(metadata))
}

/// Analyzes every file, preserving enumeration order in the output.
fn analyze_all(
    analyzer: &Analyzer<'_>,
    files: Vec<SourceFile>,
    jobs: usize,
) -> Result<Vec<datascout_core::models::FileRecord>> {
    if jobs <= 1 {
        debug!("Analyzing sequentially");
        return Ok(files
            .into_iter()
            .map(|f| analyzer.analyze(f.meta, f.content))
            .collect());
    }

    debug!("Analyzing with {} worker threads", jobs);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| {
            DataScoutError::configuration(format!("Failed to build worker pool: {}", e))
        })?;

    // par_iter + collect keeps the input order regardless of scheduling
    Ok(pool.install(|| {
        files
            .into_par_iter()
            .map(|f| analyzer.analyze(f.meta, f.content))
            .collect()
    }))
}
