//! Classification, connector detection and aggregation engine for
//! DataScout.
//!
//! This crate holds the analysis pipeline shared by the scanner binary:
//! pattern configuration, file-type classification, connector
//! identification, lexical SQL object extraction, per-file analysis and
//! the aggregation fold that produces a [`models::ScanReport`].
//!
//! # Architecture
//! - Data-driven detection: connectors are immutable pattern records
//!   iterated uniformly, not trait objects.
//! - An explicit ordered pipeline of pure stages with typed
//!   intermediates, each independently testable.
//! - Fail-isolation: one file's analysis failure is recorded as data on
//!   its record and can never abort or corrupt the rest of the scan.

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod connectors;
pub mod error;
pub mod imports;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod sql_objects;

// Re-export commonly used types
pub use aggregate::ReportBuilder;
pub use analyzer::Analyzer;
pub use error::{DataScoutError, Result};
pub use logging::init_logging;
pub use models::{
    ConnectorHit, ConnectorSummaryEntry, ConnectorType, DetectionMethod, FileError, FileErrorKind,
    FileMeta, FileRecord, FileType, ImportSummary, ProjectStatistics, ScanMetadata, ScanReport,
    SqlObjectKind, SqlObjectRef, SqlObjectsSummary, SqlOperation,
};
pub use patterns::PatternSet;
