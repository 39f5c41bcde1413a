//! End-to-end pipeline tests over the analyzer + aggregator, matching the
//! scanner's operating contract without touching the filesystem.

use datascout_core::analyzer::Analyzer;
use datascout_core::models::{
    DetectionMethod, FileError, FileErrorKind, FileMeta, FileType, ScanMetadata, SqlOperation,
};
use datascout_core::patterns::PatternSet;
use datascout_core::ReportBuilder;

fn meta(name: &str, extension: &str) -> FileMeta {
    FileMeta {
        absolute_path: format!("/project/{}", name),
        relative_path: name.to_string(),
        filename: name.to_string(),
        directory: ".".to_string(),
        extension: extension.to_string(),
        size_bytes: 256,
        modified_time: chrono::Utc::now(),
    }
}

fn load(doc: &str) -> PatternSet {
    PatternSet::from_yaml(doc).unwrap_or_else(|e| panic!("pattern document must load: {}", e))
}

#[test]
fn scenario_snowflake_keyword_plus_regex() {
    let patterns = load(
        r#"
version: "1.0"
connectors:
  snowflake:
    type: database
    keywords: ["import snowflake.connector"]
    connection_patterns: ["snowflake\\.connector\\.connect\\("]
"#,
    );
    let analyzer = Analyzer::new(&patterns);
    let mut builder = ReportBuilder::new(&patterns);

    let content = "import snowflake.connector\ncur = snowflake.connector.connect(user='a')";
    builder.add(analyzer.analyze(meta("conn.py", ".py"), Ok(content.to_string())));
    let report = builder.finish(ScanMetadata::new("/project", "project", "1.0"));

    let hits = &report.files[0].connectors["snowflake"];
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].method, DetectionMethod::Keyword);
    assert_eq!(hits[0].line, 1);
    assert_eq!(hits[1].method, DetectionMethod::Regex);
    assert_eq!(hits[1].line, 2);

    let summary = &report.connector_summary["snowflake"];
    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.total_instances, 2);
    assert_eq!(summary.connector_type.to_string(), "database");
    assert_eq!(summary.files, vec!["conn.py".to_string()]);
}

#[test]
fn scenario_sql_source_target_split() {
    let patterns = load(r#"{version: "1.0", connectors: {}}"#);
    let analyzer = Analyzer::new(&patterns);
    let mut builder = ReportBuilder::new(&patterns);

    let content = "SELECT * FROM customers_staging c JOIN orders_staging o ON c.id = o.cid; \
                   INSERT INTO customer_metrics SELECT count(*) FROM customers_staging";
    builder.add(analyzer.analyze(meta("metrics.sql", ".sql"), Ok(content.to_string())));
    let report = builder.finish(ScanMetadata::new("/project", "project", "1.0"));

    let objects = &report.files[0].sql_objects;
    let sources: Vec<&str> = objects
        .iter()
        .filter(|o| o.operation == SqlOperation::Source)
        .map(|o| o.name.as_str())
        .collect();
    let targets: Vec<&str> = objects
        .iter()
        .filter(|o| o.operation == SqlOperation::Target)
        .map(|o| o.name.as_str())
        .collect();
    assert!(sources.contains(&"customers_staging"));
    assert!(sources.contains(&"orders_staging"));
    assert_eq!(targets, vec!["customer_metrics"]);

    let tables = &report.sql_objects_summary.tables;
    assert_eq!(tables.len(), 3);
    assert!(tables.contains_key("customers_staging"));
    assert!(tables.contains_key("orders_staging"));
    assert!(tables.contains_key("customer_metrics"));
}

#[test]
fn scenario_decode_error_isolated() {
    let patterns = load(
        r#"
version: "1.0"
connectors:
  redis:
    type: nosql
    keywords: ["import redis"]
"#,
    );
    let analyzer = Analyzer::new(&patterns);
    let mut builder = ReportBuilder::new(&patterns);

    builder.add(analyzer.analyze(
        meta("mangled.py", ".py"),
        Err(FileError::new(FileErrorKind::Decode, "invalid utf-8")),
    ));
    builder.add(analyzer.analyze(
        meta("cache.py", ".py"),
        Ok("import redis\nr = redis.Redis()\n".to_string()),
    ));

    let report = builder.finish(ScanMetadata::new("/project", "project", "1.0"));

    assert_eq!(report.project_statistics.total_files, 2);
    assert_eq!(report.files[0].file_type, FileType::Unknown);
    assert_eq!(
        report.files[0].error.as_ref().map(|e| e.kind),
        Some(FileErrorKind::Decode)
    );
    // The healthy file is fully populated
    assert_eq!(report.files[1].file_type, FileType::Python);
    assert!(report.files[1].connectors.contains_key("redis"));
    assert_eq!(report.files[1].imports, vec!["import redis"]);
}

#[test]
fn repeated_scans_identical_except_metadata() {
    let patterns = PatternSet::load_default()
        .unwrap_or_else(|e| panic!("default document must load: {}", e));

    let run = || {
        let analyzer = Analyzer::new(&patterns);
        let mut builder = ReportBuilder::new(&patterns);
        let ts = chrono::DateTime::UNIX_EPOCH;
        for (name, content) in [
            ("etl.py", "from pyspark.sql import SparkSession\nimport boto3\n"),
            ("load.sql", "INSERT INTO warehouse.facts SELECT * FROM staging.raw\n"),
        ] {
            let mut m = meta(name, if name.ends_with(".sql") { ".sql" } else { ".py" });
            m.modified_time = ts;
            builder.add(analyzer.analyze(m, Ok(content.to_string())));
        }
        builder.finish(ScanMetadata::new("/project", "project", "1.0"))
    };

    let first = run();
    let second = run();

    let strip = |report: &datascout_core::ScanReport| {
        serde_json::json!({
            "project_statistics": report.project_statistics,
            "connector_summary": report.connector_summary,
            "sql_objects_summary": report.sql_objects_summary,
            "import_summary": report.import_summary,
            "files": report.files,
        })
    };
    assert_eq!(strip(&first), strip(&second));
    assert_ne!(first.scan_metadata.scan_id, second.scan_metadata.scan_id);
}

#[test]
fn full_report_serializes_with_expected_top_level_keys() {
    let patterns = PatternSet::load_default()
        .unwrap_or_else(|e| panic!("default document must load: {}", e));
    let analyzer = Analyzer::new(&patterns);
    let mut builder = ReportBuilder::new(&patterns);
    builder.add(analyzer.analyze(
        meta("job.py", ".py"),
        Ok("import requests\nrequests.get('https://api.example.com')\n".to_string()),
    ));
    let report = builder.finish(ScanMetadata::new("/project", "project", "1.0"));

    let value = serde_json::to_value(&report).unwrap_or_else(|e| panic!("serialize: {}", e));
    for key in [
        "scan_metadata",
        "project_statistics",
        "connector_summary",
        "sql_objects_summary",
        "import_summary",
        "files",
    ] {
        assert!(value.get(key).is_some(), "missing top-level key {}", key);
    }
    assert!(value["connector_summary"]["rest_api"]["total_instances"].as_u64() >= Some(2));
}
