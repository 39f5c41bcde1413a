//! Import statement extraction for Python-family files.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::FileType;

#[allow(clippy::expect_used)]
fn import_regex() -> &'static Regex {
    static IMPORT: OnceLock<Regex> = OnceLock::new();
    IMPORT.get_or_init(|| {
        Regex::new(r"^(?:import\s+[\w.]+|from\s+[\w.]+\s+import\s+.+)")
            .expect("Invalid import pattern")
    })
}

/// Extracts statement-leading import forms from python/pyspark/notebook
/// content, one entry per matching line.
///
/// First-appearance order is preserved and duplicates are retained; the
/// aggregator counts occurrences, so collapsing here would skew totals.
pub fn extract(content: &str, file_type: FileType) -> Vec<String> {
    if !matches!(
        file_type,
        FileType::Python | FileType::Pyspark | FileType::DatabricksNotebook
    ) {
        return Vec::new();
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| import_regex().is_match(line))
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_import_forms() {
        let content = "import os\nfrom pyspark.sql import SparkSession\nx = 1\n";
        let imports = extract(content, FileType::Pyspark);
        assert_eq!(
            imports,
            vec![
                "import os".to_string(),
                "from pyspark.sql import SparkSession".to_string(),
            ]
        );
    }

    #[test]
    fn test_indented_imports_trimmed_and_matched() {
        let content = "def f():\n    import json\n    return json\n";
        let imports = extract(content, FileType::Python);
        assert_eq!(imports, vec!["import json".to_string()]);
    }

    #[test]
    fn test_duplicates_retained_in_order() {
        let content = "import os\nimport sys\nimport os\n";
        let imports = extract(content, FileType::Python);
        assert_eq!(imports, vec!["import os", "import sys", "import os"]);
    }

    #[test]
    fn test_non_python_types_skipped() {
        let content = "import os\n";
        assert!(extract(content, FileType::Sql).is_empty());
        assert!(extract(content, FileType::Config).is_empty());
        assert!(extract(content, FileType::Unknown).is_empty());
    }

    #[test]
    fn test_mid_line_import_not_matched() {
        let content = "result = importlib.import_module('x')\n# import nothing\n";
        assert!(extract(content, FileType::Python).is_empty());
    }
}
