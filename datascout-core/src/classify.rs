//! File-type classification.
//!
//! Maps (extension, content) to a [`FileType`] tag. Pure and
//! deterministic: the same inputs always produce the same tag.

use crate::models::FileType;
use crate::patterns::ClassifierRules;

/// Classifies a file from its extension and decoded content.
///
/// Rule order matters: the notebook check precedes the Spark check
/// because a notebook cell may itself contain Spark code.
pub fn classify(extension: &str, content: &str, rules: &ClassifierRules) -> FileType {
    let extension = extension.to_lowercase();

    if rules.sql_extensions.iter().any(|e| *e == extension) {
        return FileType::Sql;
    }

    if rules.script_extensions.iter().any(|e| *e == extension) {
        if rules.notebook_markers.iter().any(|m| content.contains(m)) {
            return FileType::DatabricksNotebook;
        }
        if rules.spark_markers.iter().any(|m| content.contains(m)) {
            return FileType::Pyspark;
        }
        return FileType::Python;
    }

    if rules.config_extensions.iter().any(|e| *e == extension) {
        return FileType::Config;
    }

    FileType::Unknown
}
