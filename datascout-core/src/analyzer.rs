//! Per-file analysis.
//!
//! Composes classification, connector identification, SQL object
//! extraction and import extraction for one file. Fail-isolation is the
//! hard invariant here: `analyze` never returns an error. A file the
//! provider could not read or decode still produces a [`FileRecord`],
//! tagged `unknown` with an error marker, and the scan moves on.

use std::collections::BTreeMap;

use crate::classify;
use crate::connectors;
use crate::imports;
use crate::models::{FileError, FileErrorKind, FileMeta, FileRecord, FileType};
use crate::patterns::PatternSet;
use crate::sql_objects;

/// Default cap on content size submitted to the extraction passes.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

/// File content as delivered by the provider: decoded text, or the
/// per-file error that prevented decoding.
pub type ProvidedContent = std::result::Result<String, FileError>;

/// Per-file analyzer, immutable per scan.
pub struct Analyzer<'a> {
    patterns: &'a PatternSet,
    max_content_bytes: usize,
}

impl<'a> Analyzer<'a> {
    /// Creates an analyzer over a validated pattern set.
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self {
            patterns,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }

    /// Builder method to override the content-size cap.
    pub fn with_max_content_bytes(mut self, max: usize) -> Self {
        self.max_content_bytes = max;
        self
    }

    /// Analyzes one file. Never fails: provider errors and oversized
    /// content become error markers on the returned record.
    pub fn analyze(&self, meta: FileMeta, content: ProvidedContent) -> FileRecord {
        match content {
            Ok(text) if text.len() > self.max_content_bytes => {
                let error = FileError::new(
                    FileErrorKind::Extraction,
                    format!(
                        "content is {} bytes, over the {} byte analysis limit",
                        text.len(),
                        self.max_content_bytes
                    ),
                );
                let (total_lines, lines_of_code) = count_lines(&text);
                let mut record = error_record(meta, error);
                record.total_lines = total_lines;
                record.lines_of_code = lines_of_code;
                record
            }
            Ok(text) => self.analyze_content(meta, &text),
            Err(error) => error_record(meta, error),
        }
    }

    fn analyze_content(&self, meta: FileMeta, content: &str) -> FileRecord {
        let file_type = classify::classify(&meta.extension, content, self.patterns.rules());
        let connectors = connectors::identify(content, self.patterns);
        let sql_objects = sql_objects::extract(content);
        let imports = imports::extract(content, file_type);
        let (total_lines, lines_of_code) = count_lines(content);

        let has_spark =
            file_type == FileType::Pyspark || content.to_lowercase().contains("spark");
        let has_sql = !sql_objects.is_empty() || file_type == FileType::Sql;

        FileRecord {
            meta,
            file_type,
            total_lines,
            lines_of_code,
            connectors,
            sql_objects,
            imports,
            has_spark,
            has_sql,
            error: None,
        }
    }
}

/// (total lines, lines of code). LOC excludes blank lines and `#` comments.
fn count_lines(content: &str) -> (usize, usize) {
    let mut total = 0;
    let mut loc = 0;
    for line in content.lines() {
        total += 1;
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            loc += 1;
        }
    }
    (total, loc)
}

fn error_record(meta: FileMeta, error: FileError) -> FileRecord {
    FileRecord {
        meta,
        file_type: FileType::Unknown,
        total_lines: 0,
        lines_of_code: 0,
        connectors: BTreeMap::new(),
        sql_objects: Vec::new(),
        imports: Vec::new(),
        has_spark: false,
        has_sql: false,
        error: Some(error),
    }
}
