//! Single-pass aggregation of file records into a scan report.
//!
//! The fold is order-preserving: the `files` sequence of the report keeps
//! the provider's enumeration order end-to-end, and every summary count is
//! an exact marginal derivable by replaying that sequence.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    ConnectorSummaryEntry, ConnectorType, FileRecord, ImportCount, ImportSummary,
    ProjectStatistics, ScanMetadata, ScanReport, SqlObjectKind, SqlObjectsSummary,
};
use crate::patterns::PatternSet;

/// Cap on the `top_imports` list in the final report.
const TOP_IMPORTS_LIMIT: usize = 20;

/// Accumulates file records into a [`ScanReport`].
///
/// The builder is the only mutable state of a scan. With a worker pool
/// the caller collects records back into enumeration order first; the
/// fold itself is strictly sequential.
pub struct ReportBuilder {
    /// Connector name to type, from the pattern configuration. Hits do
    /// not embed the type (it is configuration, not observation).
    connector_types: BTreeMap<String, ConnectorType>,
    files: Vec<FileRecord>,
    directories: BTreeSet<String>,
    connector_summary: BTreeMap<String, ConnectorSummaryEntry>,
    tables: BTreeMap<String, usize>,
    views: BTreeMap<String, usize>,
    import_counts: BTreeMap<String, usize>,
    stats: ProjectStatistics,
}

impl ReportBuilder {
    /// Creates an empty builder over the scan's pattern set.
    pub fn new(patterns: &PatternSet) -> Self {
        let connector_types = patterns
            .connectors()
            .iter()
            .map(|(name, c)| (name.clone(), c.connector_type))
            .collect();
        Self {
            connector_types,
            files: Vec::new(),
            directories: BTreeSet::new(),
            connector_summary: BTreeMap::new(),
            tables: BTreeMap::new(),
            views: BTreeMap::new(),
            import_counts: BTreeMap::new(),
            stats: ProjectStatistics::default(),
        }
    }

    /// Folds one record into the running totals and takes ownership of it.
    pub fn add(&mut self, record: FileRecord) {
        self.stats.total_files += 1;
        self.stats.total_size_bytes += record.meta.size_bytes;
        self.stats.total_lines += record.total_lines;
        self.stats.total_loc += record.lines_of_code;
        *self.stats.file_types.entry(record.file_type).or_insert(0) += 1;
        if record.has_spark {
            self.stats.files_with_spark += 1;
        }
        if record.has_sql {
            self.stats.files_with_sql += 1;
        }
        if let Some(error) = &record.error {
            self.stats.files_with_errors += 1;
            *self.stats.error_kinds.entry(error.kind).or_insert(0) += 1;
        }
        self.directories.insert(record.meta.directory.clone());

        for (name, hits) in &record.connectors {
            let connector_type = self
                .connector_types
                .get(name)
                .copied()
                .unwrap_or(ConnectorType::Database);
            let entry = self
                .connector_summary
                .entry(name.clone())
                .or_insert_with(|| ConnectorSummaryEntry {
                    total_files: 0,
                    total_instances: 0,
                    connector_type,
                    files: Vec::new(),
                });
            entry.total_files += 1;
            entry.total_instances += hits.len();
            entry.files.push(record.meta.relative_path.clone());
        }

        for object in &record.sql_objects {
            let bucket = match object.kind {
                SqlObjectKind::Table => &mut self.tables,
                SqlObjectKind::View => &mut self.views,
            };
            *bucket.entry(object.name.clone()).or_insert(0) += 1;
        }

        for import in &record.imports {
            *self.import_counts.entry(import.clone()).or_insert(0) += 1;
        }

        self.files.push(record);
    }

    /// Finalizes the report. `metadata.duration_ms` is expected to be set
    /// by the caller once the scan clock stops.
    pub fn finish(mut self, metadata: ScanMetadata) -> ScanReport {
        self.stats.total_directories = self.directories.len();

        let mut top_imports: Vec<ImportCount> = self
            .import_counts
            .iter()
            .map(|(import, count)| ImportCount {
                import: import.clone(),
                count: *count,
            })
            .collect();
        // Count-descending; map iteration already gave name-ascending and
        // the sort is stable, so ties stay deterministic.
        top_imports.sort_by(|a, b| b.count.cmp(&a.count));
        top_imports.truncate(TOP_IMPORTS_LIMIT);

        ScanReport {
            scan_metadata: metadata,
            project_statistics: self.stats,
            connector_summary: self.connector_summary,
            sql_objects_summary: SqlObjectsSummary {
                total_tables: self.tables.len(),
                total_views: self.views.len(),
                tables: self.tables,
                views: self.views,
            },
            import_summary: ImportSummary {
                total_unique_imports: self.import_counts.len(),
                top_imports,
            },
            files: self.files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::models::{FileError, FileErrorKind, FileMeta, FileType};

    fn meta(name: &str, dir: &str, extension: &str, size: u64) -> FileMeta {
        FileMeta {
            absolute_path: format!("/project/{}/{}", dir, name),
            relative_path: format!("{}/{}", dir, name),
            filename: name.to_string(),
            directory: dir.to_string(),
            extension: extension.to_string(),
            size_bytes: size,
            modified_time: chrono::Utc::now(),
        }
    }

    fn patterns() -> PatternSet {
        PatternSet::load_default().unwrap_or_else(|e| {
            unreachable!("default document must load: {}", e);
        })
    }

    #[test]
    fn test_fold_invariants() {
        let patterns = patterns();
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);

        let contents = [
            ("a.py", "etl", ".py", "import pymongo\nclient = MongoClient(host)\n"),
            ("b.sql", "sql", ".sql", "SELECT * FROM events\n"),
            ("c.py", "etl", ".py", "import os\n"),
        ];
        for (name, dir, extension, content) in contents {
            let record = analyzer.analyze(
                meta(name, dir, extension, 100),
                Ok(content.to_string()),
            );
            builder.add(record);
        }

        let report = builder.finish(ScanMetadata::new("/project", "project", "1.0"));

        let stats = &report.project_statistics;
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size_bytes, 300);
        assert_eq!(stats.total_directories, 2);
        let type_sum: usize = stats.file_types.values().sum();
        assert_eq!(type_sum, stats.total_files);

        // Summary instances equal the replayed per-file hit counts
        let mongo = report.connector_summary.get("mongodb");
        let replayed: usize = report
            .files
            .iter()
            .filter_map(|f| f.connectors.get("mongodb"))
            .map(Vec::len)
            .sum();
        assert_eq!(mongo.map(|e| e.total_instances), Some(replayed));
        assert_eq!(mongo.map(|e| e.total_files), Some(1));

        assert_eq!(report.sql_objects_summary.tables.get("events"), Some(&1));
        assert_eq!(report.sql_objects_summary.total_tables, 1);
        assert_eq!(report.sql_objects_summary.total_views, 0);
    }

    #[test]
    fn test_output_order_preserved() {
        let patterns = patterns();
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);

        // Deliberately not name-sorted input
        for name in ["z.py", "a.py", "m.py"] {
            builder.add(analyzer.analyze(meta(name, ".", ".py", 1), Ok(String::new())));
        }
        let report = builder.finish(ScanMetadata::new("/p", "p", "1.0"));
        let names: Vec<&str> = report.files.iter().map(|f| f.meta.filename.as_str()).collect();
        assert_eq!(names, vec!["z.py", "a.py", "m.py"]);
    }

    #[test]
    fn test_error_file_does_not_suppress_others() {
        let patterns = patterns();
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);

        builder.add(analyzer.analyze(
            meta("broken.py", ".", ".py", 50),
            Err(FileError::new(FileErrorKind::Decode, "binary content")),
        ));
        builder.add(analyzer.analyze(
            meta("ok.py", ".", ".py", 60),
            Ok("import redis\nr = redis.Redis()\n".to_string()),
        ));

        let report = builder.finish(ScanMetadata::new("/p", "p", "1.0"));

        assert_eq!(report.project_statistics.total_files, 2);
        assert_eq!(report.project_statistics.files_with_errors, 1);
        assert_eq!(
            report.project_statistics.error_kinds.get(&FileErrorKind::Decode),
            Some(&1)
        );
        assert_eq!(report.files[0].file_type, FileType::Unknown);
        assert!(report.files[0].error.is_some());
        assert!(report.files[1].error.is_none());
        assert!(report.connector_summary.contains_key("redis"));
    }

    #[test]
    fn test_import_summary_counts_and_ties() {
        let patterns = patterns();
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);

        builder.add(analyzer.analyze(
            meta("a.py", ".", ".py", 1),
            Ok("import os\nimport sys\n".to_string()),
        ));
        builder.add(analyzer.analyze(
            meta("b.py", ".", ".py", 1),
            Ok("import os\n".to_string()),
        ));

        let report = builder.finish(ScanMetadata::new("/p", "p", "1.0"));
        let imports = &report.import_summary;
        assert_eq!(imports.total_unique_imports, 2);
        assert_eq!(imports.top_imports[0].import, "import os");
        assert_eq!(imports.top_imports[0].count, 2);
        assert_eq!(imports.top_imports[1].import, "import sys");
        assert_eq!(imports.top_imports[1].count, 1);
    }

    #[test]
    fn test_distinct_sql_objects_exact_string() {
        let patterns = patterns();
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);

        builder.add(analyzer.analyze(
            meta("a.sql", ".", ".sql", 1),
            Ok("SELECT * FROM Orders; SELECT * FROM orders;".to_string()),
        ));

        let report = builder.finish(ScanMetadata::new("/p", "p", "1.0"));
        // No case folding: "Orders" and "orders" stay distinct
        assert_eq!(report.sql_objects_summary.total_tables, 2);
    }
}
