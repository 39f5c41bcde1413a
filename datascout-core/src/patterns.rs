//! Pattern configuration for connector detection and file classification.
//!
//! Loads a versioned YAML pattern document once per scan and compiles it
//! into an immutable [`PatternSet`]. An alternate document passed by the
//! caller fully replaces the built-in defaults; there is no merging and no
//! hot reload. Every validation failure is a fatal
//! [`DataScoutError::Configuration`] naming the offending connector or
//! pattern, so malformed regexes can never surface mid-scan.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DataScoutError, Result};
use crate::models::ConnectorType;

/// Built-in pattern document, embedded at compile time.
const DEFAULT_PATTERNS: &str = include_str!("../patterns/connector_patterns.yaml");

/// Raw pattern document as deserialized from YAML.
#[derive(Debug, Deserialize)]
struct PatternDocument {
    version: String,
    #[serde(default)]
    connectors: BTreeMap<String, ConnectorSpec>,
    #[serde(default)]
    file_types: BTreeMap<String, FileTypeSpec>,
}

/// One connector entry in the document.
#[derive(Debug, Deserialize)]
struct ConnectorSpec {
    #[serde(rename = "type")]
    connector_type: ConnectorType,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    connection_patterns: Vec<String>,
}

/// One file-type entry in the document.
#[derive(Debug, Default, Deserialize)]
struct FileTypeSpec {
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    content_markers: Vec<String>,
}

/// A compiled connection pattern, keeping its source string for reporting.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: Regex,
}

/// Compiled detection patterns for one connector.
#[derive(Debug, Clone)]
pub struct ConnectorPatterns {
    pub connector_type: ConnectorType,
    pub keywords: Vec<String>,
    pub patterns: Vec<CompiledPattern>,
}

/// Classification rules derived from the document's `file_types` section.
#[derive(Debug, Clone, Default)]
pub struct ClassifierRules {
    /// Extensions classified as SQL (`.sql`, `.ddl`, ...)
    pub sql_extensions: Vec<String>,
    /// General-script extensions eligible for notebook/pyspark refinement
    pub script_extensions: Vec<String>,
    /// Extensions classified as configuration
    pub config_extensions: Vec<String>,
    /// Content markers identifying a Databricks notebook cell layout
    pub notebook_markers: Vec<String>,
    /// Content markers identifying Spark session usage or imports
    pub spark_markers: Vec<String>,
}

/// Immutable, validated pattern set for one scan.
#[derive(Debug, Clone)]
pub struct PatternSet {
    version: String,
    connectors: BTreeMap<String, ConnectorPatterns>,
    rules: ClassifierRules,
}

impl PatternSet {
    /// Loads and compiles the built-in default document.
    ///
    /// The embedded document is part of the crate, so a failure here is a
    /// packaging bug; it still reports as a configuration error rather
    /// than panicking.
    pub fn load_default() -> Result<Self> {
        let set = Self::from_yaml(DEFAULT_PATTERNS)?;
        info!("Loaded {} connector patterns (built-in)", set.connectors.len());
        Ok(set)
    }

    /// Loads and compiles an alternate document, fully replacing defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DataScoutError::configuration(format!(
                "Failed to read pattern document {}: {}",
                path.display(),
                e
            ))
        })?;
        let set = Self::from_yaml(&text)?;
        info!(
            "Loaded {} connector patterns from {}",
            set.connectors.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parses, validates and compiles a YAML pattern document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let doc: PatternDocument = serde_yaml::from_str(text).map_err(|e| {
            DataScoutError::configuration(format!("Invalid pattern document: {}", e))
        })?;
        Self::compile(doc)
    }

    fn compile(doc: PatternDocument) -> Result<Self> {
        let mut connectors = BTreeMap::new();

        for (name, spec) in doc.connectors {
            if name.trim().is_empty() {
                return Err(DataScoutError::configuration(
                    "Connector with empty name in pattern document",
                ));
            }
            if spec.keywords.is_empty() && spec.connection_patterns.is_empty() {
                return Err(DataScoutError::configuration(format!(
                    "Connector '{}' declares no keywords and no connection patterns",
                    name
                )));
            }

            let mut patterns = Vec::with_capacity(spec.connection_patterns.len());
            for source in spec.connection_patterns {
                let regex = Regex::new(&source).map_err(|e| {
                    DataScoutError::configuration(format!(
                        "Connector '{}': invalid pattern '{}': {}",
                        name, source, e
                    ))
                })?;
                patterns.push(CompiledPattern { source, regex });
            }

            debug!(
                "Compiled connector '{}': {} keywords, {} patterns",
                name,
                spec.keywords.len(),
                patterns.len()
            );

            connectors.insert(
                name,
                ConnectorPatterns {
                    connector_type: spec.connector_type,
                    keywords: spec.keywords,
                    patterns,
                },
            );
        }

        let rules = Self::classifier_rules(&doc.file_types);

        Ok(Self {
            version: doc.version,
            connectors,
            rules,
        })
    }

    fn classifier_rules(file_types: &BTreeMap<String, FileTypeSpec>) -> ClassifierRules {
        let extensions = |key: &str| -> Vec<String> {
            file_types
                .get(key)
                .map(|s| s.extensions.iter().map(|e| e.to_lowercase()).collect())
                .unwrap_or_default()
        };
        let markers = |key: &str| -> Vec<String> {
            file_types
                .get(key)
                .map(|s| s.content_markers.clone())
                .unwrap_or_default()
        };

        ClassifierRules {
            sql_extensions: extensions("sql"),
            script_extensions: extensions("python"),
            config_extensions: extensions("config"),
            notebook_markers: markers("databricks_notebook"),
            spark_markers: markers("pyspark"),
        }
    }

    /// Version string of the loaded document.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Compiled connectors, name-ordered.
    pub fn connectors(&self) -> &BTreeMap<String, ConnectorPatterns> {
        &self.connectors
    }

    /// Classification rules for the file classifier.
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }
}
