//! File provider: enumerates and reads project files.
//!
//! Walks the project root with a configurable directory denylist and a
//! supported-extension allowlist, yielding each file's metadata together
//! with its decoded content. Read and decode failures never abort
//! enumeration; they travel with the file as per-file error markers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use datascout_core::models::{FileError, FileErrorKind, FileMeta};
use datascout_core::{DataScoutError, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories pruned from traversal by default.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".svn",
    "node_modules",
    "venv",
    "env",
    ".venv",
    ".env",
    "dist",
    "build",
    "target",
    ".idea",
    ".vscode",
    ".pytest_cache",
    ".mypy_cache",
    "htmlcov",
    "coverage",
];

/// Extensions admitted for analysis (lowercase, with leading dot).
const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".py", ".sql", ".ddl", ".dml", ".yaml", ".yml", ".json", ".conf", ".ini", ".properties",
    ".sh", ".bash", ".scala", ".r",
];

/// Traversal configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    excluded_dirs: BTreeSet<String>,
    supported_extensions: BTreeSet<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
            supported_extensions: SUPPORTED_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ProviderConfig {
    /// Creates a config with the default denylist and extension set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds directories to the denylist.
    pub fn with_excluded_dirs(mut self, dirs: impl IntoIterator<Item = String>) -> Self {
        self.excluded_dirs.extend(dirs);
        self
    }

    fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions.contains(extension)
    }
}

/// A discovered file: metadata plus decoded content or its per-file error.
#[derive(Debug)]
pub struct SourceFile {
    pub meta: FileMeta,
    pub content: std::result::Result<String, FileError>,
}

/// Enumerates all supported files under `root` in deterministic
/// (name-sorted, depth-first) order.
///
/// Only a missing or unreadable root is fatal; everything below that is
/// reported per file.
pub fn enumerate(root: &Path, config: &ProviderConfig) -> Result<Vec<SourceFile>> {
    let root = resolve_root(root)?;

    let mut files = Vec::new();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() && entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                if config.is_excluded_dir(&name) {
                    debug!("Skipping excluded directory {}", entry.path().display());
                    return false;
                }
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error while walking project tree: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        if !config.is_supported(&extension) {
            continue;
        }

        files.push(read_source_file(path, &root, extension, &entry));
    }

    debug!("Enumerated {} files under {}", files.len(), root.display());
    Ok(files)
}

fn read_source_file(
    path: &Path,
    root: &Path,
    extension: String,
    entry: &walkdir::DirEntry,
) -> SourceFile {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let directory = relative
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| ".".to_string());

    let (size_bytes, modified_time, stat_error) = match entry.metadata() {
        Ok(metadata) => {
            let modified = metadata
                .modified()
                .map(chrono::DateTime::<chrono::Utc>::from)
                .unwrap_or_else(|_| chrono::Utc::now());
            (metadata.len(), modified, None)
        }
        Err(e) => (
            0,
            chrono::Utc::now(),
            Some(FileError::new(
                FileErrorKind::FileAccess,
                format!("failed to stat file: {}", e),
            )),
        ),
    };

    let meta = FileMeta {
        absolute_path: path.to_string_lossy().to_string(),
        relative_path: relative.to_string_lossy().to_string(),
        filename: entry.file_name().to_string_lossy().to_string(),
        directory,
        extension,
        size_bytes,
        modified_time,
    };

    let content = match stat_error {
        Some(error) => Err(error),
        None => read_content(path),
    };

    SourceFile { meta, content }
}

/// Reads and decodes file content: strict UTF-8 first, Latin-1 fallback.
/// Content with NUL bytes is treated as binary and refused.
fn read_content(path: &Path) -> std::result::Result<String, FileError> {
    let bytes = std::fs::read(path).map_err(|e| {
        FileError::new(FileErrorKind::FileAccess, format!("failed to read file: {}", e))
    })?;

    if bytes.contains(&0) {
        return Err(FileError::new(
            FileErrorKind::Decode,
            "binary content (NUL byte present)",
        ));
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        // Latin-1 is total over bytes, so the fallback cannot fail
        Err(e) => Ok(e.into_bytes().iter().map(|&b| b as char).collect()),
    }
}

/// Returns a file path's project name, for scan metadata.
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

/// Canonicalized root as a `PathBuf`, config-error on failure.
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(root).map_err(|e| {
        DataScoutError::configuration(format!(
            "Project path does not exist: {}: {}",
            root.display(),
            e
        ))
    })
}
