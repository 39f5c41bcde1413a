//! Core data models for scan results.
//!
//! Defines the unified structures used to describe a scanned project:
//! per-file records produced by the analyzer and the aggregated report
//! handed to the writer. All models are serializable; a `FileRecord` is
//! created once by the analyzer and immutable afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category of external system a connector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Database,
    Nosql,
    Storage,
    Warehouse,
    Platform,
    Messaging,
    Api,
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectorType::Database => "database",
            ConnectorType::Nosql => "nosql",
            ConnectorType::Storage => "storage",
            ConnectorType::Warehouse => "warehouse",
            ConnectorType::Platform => "platform",
            ConnectorType::Messaging => "messaging",
            ConnectorType::Api => "api",
        };
        write!(f, "{}", name)
    }
}

/// Computed file type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Python,
    Pyspark,
    Sql,
    DatabricksNotebook,
    Config,
    Unknown,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileType::Python => "python",
            FileType::Pyspark => "pyspark",
            FileType::Sql => "sql",
            FileType::DatabricksNotebook => "databricks_notebook",
            FileType::Config => "config",
            FileType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// How a connector reference was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Keyword,
    Regex,
}

/// A single detected connector reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorHit {
    /// Detection pass that produced this hit
    pub method: DetectionMethod,
    /// The keyword or regex source string that matched
    pub pattern: String,
    /// Matched text, present for regex hits only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    /// Best-effort 1-based line number. Computed from the newline count
    /// before the match offset, so multi-line regex matches are attributed
    /// to their starting line.
    pub line: u32,
}

/// Kind of relational object referenced by a SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlObjectKind {
    Table,
    View,
}

/// Role the object plays in the referencing statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlOperation {
    /// Read side (FROM / JOIN)
    Source,
    /// Write side (CREATE / INTO / UPDATE)
    Target,
    /// Bare TABLE reference with no determinable role
    Unknown,
}

/// A table or view reference extracted from content.
///
/// Names are recorded exactly as matched, with no case folding or schema
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlObjectRef {
    pub kind: SqlObjectKind,
    pub name: String,
    pub operation: SqlOperation,
}

/// Kind of per-file failure. Recorded on the record, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    /// The file could not be read from disk
    FileAccess,
    /// The file contents could not be decoded to text
    Decode,
    /// Analysis of the decoded content was skipped or failed
    Extraction,
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileErrorKind::FileAccess => "file_access",
            FileErrorKind::Decode => "decode",
            FileErrorKind::Extraction => "extraction",
        };
        write!(f, "{}", name)
    }
}

/// Per-file error marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub kind: FileErrorKind,
    pub message: String,
}

impl FileError {
    /// Creates a new error marker.
    pub fn new(kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Filesystem metadata for a discovered file, as yielded by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    pub absolute_path: String,
    pub relative_path: String,
    pub filename: String,
    /// Directory containing the file, relative to the project root
    pub directory: String,
    /// Lowercased extension including the leading dot, empty if none
    pub extension: String,
    pub size_bytes: u64,
    pub modified_time: chrono::DateTime<chrono::Utc>,
}

/// Complete analysis result for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(flatten)]
    pub meta: FileMeta,
    pub file_type: FileType,
    pub total_lines: usize,
    /// Non-blank lines that are not `#` comments
    pub lines_of_code: usize,
    /// Sparse: connectors with zero hits are absent entirely
    pub connectors: BTreeMap<String, Vec<ConnectorHit>>,
    pub sql_objects: Vec<SqlObjectRef>,
    /// Import statements in first-appearance order, duplicates retained
    pub imports: Vec<String>,
    pub has_spark: bool,
    pub has_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FileError>,
}

impl FileRecord {
    /// Total connector hit count across all connectors.
    pub fn connector_instances(&self) -> usize {
        self.connectors.values().map(Vec::len).sum()
    }
}

/// Per-connector aggregate over the whole project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSummaryEntry {
    /// Files with at least one hit for this connector
    pub total_files: usize,
    /// Sum of hit counts across files
    pub total_instances: usize,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    /// Relative paths of matching files, enumeration order
    pub files: Vec<String>,
}

/// Distinct tables and views referenced anywhere in the project.
///
/// Keys are exact matched names; values are instance counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqlObjectsSummary {
    pub total_tables: usize,
    pub total_views: usize,
    pub tables: BTreeMap<String, usize>,
    pub views: BTreeMap<String, usize>,
}

/// A single import statement with its project-wide occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCount {
    pub import: String,
    pub count: usize,
}

/// Aggregated import statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_unique_imports: usize,
    /// Most frequent imports, count-descending (name ascending on ties),
    /// capped at 20 entries
    pub top_imports: Vec<ImportCount>,
}

/// Project-wide statistics derived from the file records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectStatistics {
    pub total_files: usize,
    pub total_directories: usize,
    pub total_size_bytes: u64,
    pub total_lines: usize,
    pub total_loc: usize,
    pub file_types: BTreeMap<FileType, usize>,
    pub files_with_spark: usize,
    pub files_with_sql: usize,
    pub files_with_errors: usize,
    pub error_kinds: BTreeMap<FileErrorKind, usize>,
}

/// Scan provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub project_path: String,
    pub project_name: String,
    pub scan_id: uuid::Uuid,
    pub scan_timestamp: chrono::DateTime<chrono::Utc>,
    pub analyzer_version: String,
    /// Version field of the pattern document used for this scan
    pub patterns_version: String,
    pub duration_ms: u64,
}

impl ScanMetadata {
    /// Creates metadata for a scan starting now.
    pub fn new(
        project_path: impl Into<String>,
        project_name: impl Into<String>,
        patterns_version: impl Into<String>,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            project_name: project_name.into(),
            scan_id: uuid::Uuid::new_v4(),
            scan_timestamp: chrono::Utc::now(),
            analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
            patterns_version: patterns_version.into(),
            duration_ms: 0,
        }
    }
}

/// Complete scan report.
///
/// Every summary count is an exact marginal aggregate derivable by
/// replaying `files`, which preserves the provider's enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_metadata: ScanMetadata,
    pub project_statistics: ProjectStatistics,
    pub connector_summary: BTreeMap<String, ConnectorSummaryEntry>,
    pub sql_objects_summary: SqlObjectsSummary,
    pub import_summary: ImportSummary,
    pub files: Vec<FileRecord>,
}
