//! Input discovery

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use zoning_types::{RawDocument, Unresolved, UnresolvedReason};

/// Files under `root` whose extension is one of `extensions`, sorted
pub fn discover(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if path.is_file() && wanted {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

/// Path relative to `root` with forward slashes
pub fn source_id(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Read a file into a raw document identified by its path relative to `root`
pub fn load(root: &Path, path: &Path) -> Result<RawDocument> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut document = RawDocument::new(source_id(root, path), bytes);
    if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
        document = document.with_modified_at(DateTime::<Utc>::from(modified));
    }
    Ok(document)
}

/// Read every file. A file that cannot be read becomes an unresolved marker.
pub fn load_all(root: &Path, files: &[PathBuf]) -> (Vec<RawDocument>, Vec<Unresolved>) {
    let mut documents = Vec::with_capacity(files.len());
    let mut unreadable = Vec::new();
    for path in files {
        match load(root, path) {
            Ok(document) => documents.push(document),
            Err(err) => {
                let marker = Unresolved {
                    source_id: source_id(root, path),
                    reason: UnresolvedReason::Decode,
                    detail: format!("{:#}", err),
                };
                warn!(source_id = %marker.source_id, error = %marker.detail, "Unreadable input file");
                unreadable.push(marker);
            }
        }
    }
    (documents, unreadable)
}
