//! Lexical SQL object extraction.
//!
//! Extracts table/view references and their source/target role from any
//! content, regardless of file type - embedded query strings in scripts
//! qualify. This is deliberately not a SQL parser: there is no nesting or
//! statement-boundary tracking, so subqueries, CTEs and multi-line
//! statements may be mis-attributed. That best-effort contract is part of
//! the module's interface, not a bug to fix here.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{SqlObjectKind, SqlObjectRef, SqlOperation};

/// Identifier tokens that look like object names but never are.
const STOP_WORDS: &[&str] = &["select", "as", "on", "where", "set", "values"];

/// Statement-keyword regex, compiled once per process.
///
/// Alternation order matters: `CREATE ... VIEW` / `CREATE TABLE` must come
/// before the bare `TABLE` branch so the longer form wins at the same
/// offset. The name group accepts up to three dotted parts with optional
/// backtick or double-quote wrapping.
#[allow(clippy::expect_used)]
fn statement_regex() -> &'static Regex {
    static STMT: OnceLock<Regex> = OnceLock::new();
    STMT.get_or_init(|| {
        Regex::new(
            r#"(?ix)
            \b(?P<kw>
                CREATE\s+(?:OR\s+REPLACE\s+)?VIEW
              | CREATE\s+TABLE(?:\s+IF\s+NOT\s+EXISTS)?
              | FROM
              | JOIN
              | INTO
              | UPDATE
              | TABLE
            )\s+
            (?P<name>[`"]?[A-Za-z_][\w$]*[`"]?(?:\.[`"]?[A-Za-z_][\w$]*[`"]?){0,2})
            "#,
        )
        .expect("Invalid SQL statement pattern")
    })
}

/// Extracts all table/view references from `content`.
///
/// FROM/JOIN => source; CREATE VIEW/CREATE TABLE/INTO/UPDATE => target;
/// bare TABLE => unknown. Names are recorded exactly as matched (minus
/// quoting), with no case or schema normalization.
pub fn extract(content: &str) -> Vec<SqlObjectRef> {
    let mut refs = Vec::new();

    for caps in statement_regex().captures_iter(content) {
        let (Some(kw), Some(name)) = (caps.name("kw"), caps.name("name")) else {
            continue;
        };

        let cleaned = strip_quotes(name.as_str());
        if cleaned.is_empty() || STOP_WORDS.contains(&cleaned.to_lowercase().as_str()) {
            continue;
        }

        let keyword = normalize_keyword(kw.as_str());
        let (kind, operation) = match keyword.as_str() {
            "FROM" | "JOIN" => (SqlObjectKind::Table, SqlOperation::Source),
            "CREATE VIEW" => (SqlObjectKind::View, SqlOperation::Target),
            "CREATE TABLE" | "INTO" | "UPDATE" => (SqlObjectKind::Table, SqlOperation::Target),
            _ => (SqlObjectKind::Table, SqlOperation::Unknown),
        };

        refs.push(SqlObjectRef {
            kind,
            name: cleaned,
            operation,
        });
    }

    refs
}

/// Collapses a matched keyword to its canonical spelling: whitespace runs
/// become single spaces, and the optional OR REPLACE / IF NOT EXISTS
/// decorations are dropped.
fn normalize_keyword(raw: &str) -> String {
    let mut words: Vec<String> = raw
        .split_whitespace()
        .map(|w| w.to_uppercase())
        .filter(|w| !matches!(w.as_str(), "OR" | "REPLACE" | "IF" | "NOT" | "EXISTS"))
        .collect();
    if words.len() > 2 {
        words.truncate(2);
    }
    words.join(" ")
}

/// Removes backtick/double-quote wrapping from each dotted part.
fn strip_quotes(name: &str) -> String {
    name.split('.')
        .map(|part| part.trim_matches(|c| c == '`' || c == '"'))
        .collect::<Vec<_>>()
        .join(".")
}
