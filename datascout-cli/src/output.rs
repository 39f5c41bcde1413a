//! Report output: JSON file writing and the human-readable summary.

use std::fmt::Write as _;
use std::path::Path;

use datascout_core::models::ScanReport;
use datascout_core::{DataScoutError, Result};
use tracing::info;

const RULE: &str = "================================================================================";

/// Writes the report as pretty-printed JSON, creating parent directories
/// as needed.
pub fn write_report(report: &ScanReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DataScoutError::io(format!("creating output directory {}", parent.display()), e)
            })?;
        }
    }

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| DataScoutError::serialization("encoding scan report", e))?;
    std::fs::write(path, json)
        .map_err(|e| DataScoutError::io(format!("writing report to {}", path.display()), e))?;

    info!("Report written to {}", path.display());
    Ok(())
}

/// Renders a human-readable summary of the report.
#[allow(clippy::cast_precision_loss)]
pub fn render_summary(report: &ScanReport) -> String {
    let stats = &report.project_statistics;
    let mut out = String::new();

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "PROJECT ANALYSIS REPORT");
    let _ = writeln!(out, "{RULE}\n");
    let _ = writeln!(out, "Project: {}", report.scan_metadata.project_name);
    let _ = writeln!(out, "Scan Date: {}", report.scan_metadata.scan_timestamp);
    let _ = writeln!(out, "Path: {}", report.scan_metadata.project_path);

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "PROJECT STATISTICS");
    let _ = writeln!(out, "{RULE}\n");
    let _ = writeln!(out, "Total Files: {}", stats.total_files);
    let _ = writeln!(out, "Total Directories: {}", stats.total_directories);
    let _ = writeln!(
        out,
        "Total Size: {:.2} MB",
        stats.total_size_bytes as f64 / 1024.0 / 1024.0
    );
    let _ = writeln!(out, "Total Lines of Code: {}", stats.total_loc);
    let _ = writeln!(out, "\nFiles with Spark: {}", stats.files_with_spark);
    let _ = writeln!(out, "Files with SQL: {}", stats.files_with_sql);
    if stats.files_with_errors > 0 {
        let _ = writeln!(out, "Files with Errors: {}", stats.files_with_errors);
    }

    let _ = writeln!(out, "\nFile Type Breakdown:");
    for (file_type, count) in &stats.file_types {
        let _ = writeln!(out, "  {file_type}: {count}");
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "CONNECTORS DETECTED ({})", report.connector_summary.len());
    let _ = writeln!(out, "{RULE}");
    if report.connector_summary.is_empty() {
        let _ = writeln!(out, "No connectors detected");
    } else {
        for (name, entry) in &report.connector_summary {
            let _ = writeln!(
                out,
                "\n{} ({})",
                name.to_uppercase(),
                entry.connector_type
            );
            let _ = writeln!(out, "  Files: {}", entry.total_files);
            let _ = writeln!(out, "  Instances: {}", entry.total_instances);
        }
    }

    let sql = &report.sql_objects_summary;
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "SQL OBJECTS");
    let _ = writeln!(out, "{RULE}\n");
    let _ = writeln!(out, "Total Tables Referenced: {}", sql.total_tables);
    let _ = writeln!(out, "Total Views Referenced: {}", sql.total_views);
    if !sql.tables.is_empty() {
        let _ = writeln!(out, "\nTop 10 Tables:");
        for table in sql.tables.keys().take(10) {
            let _ = writeln!(out, "  - {table}");
        }
    }

    let _ = writeln!(out, "\n{RULE}");
    out
}
