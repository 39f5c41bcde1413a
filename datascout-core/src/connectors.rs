//! Connector identification.
//!
//! Detects external-system references in file content via two independent
//! passes per connector: a keyword substring pass and a compiled-regex
//! pass. Every occurrence is recorded; there is no cross-connector
//! exclusivity and no per-line deduplication. Connectors with zero hits
//! are omitted from the result entirely. Malformed patterns cannot reach
//! this module: they fail at configuration load.

use std::collections::BTreeMap;

use crate::models::{ConnectorHit, DetectionMethod};
use crate::patterns::PatternSet;

/// Identifies all connector references in `content`.
///
/// Returns a sparse map from connector name to its hits; a connector
/// without hits never appears as an empty entry.
pub fn identify(content: &str, patterns: &PatternSet) -> BTreeMap<String, Vec<ConnectorHit>> {
    let mut detected = BTreeMap::new();

    for (name, connector) in patterns.connectors() {
        let mut hits = Vec::new();

        for keyword in &connector.keywords {
            for (offset, _) in content.match_indices(keyword.as_str()) {
                hits.push(ConnectorHit {
                    method: DetectionMethod::Keyword,
                    pattern: keyword.clone(),
                    matched_text: None,
                    line: line_at(content, offset),
                });
            }
        }

        for pattern in &connector.patterns {
            for m in pattern.regex.find_iter(content) {
                hits.push(ConnectorHit {
                    method: DetectionMethod::Regex,
                    pattern: pattern.source.clone(),
                    matched_text: Some(m.as_str().to_string()),
                    line: line_at(content, m.start()),
                });
            }
        }

        if !hits.is_empty() {
            detected.insert(name.clone(), hits);
        }
    }

    detected
}

/// 1-based line number of a byte offset, from the cumulative newline
/// count. Multi-line regex matches are attributed to their starting line.
fn line_at(content: &str, offset: usize) -> u32 {
    let newlines = content
        .as_bytes()
        .iter()
        .take(offset)
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1)
}
