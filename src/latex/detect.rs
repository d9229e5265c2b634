//! Main-document detection.
//!
//! Scans a source tree for `.tex` files declaring `\documentclass` and picks
//! exactly one root deterministically.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::util::read_text_file;

/// Conventional root-document names, checked in order when several candidates
/// declare `\documentclass`.
const MAIN_PRIORITY: &[&str] = &["main.tex", "paper.tex", "manuscript.tex", "article.tex"];

/// Find the single main document under `tree_root`.
///
/// Returns its path relative to `tree_root`. Tie-break order for multiple
/// candidates: priority filename, then shallowest path, then lexical path.
pub fn detect_main_document(tree_root: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(tree_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tex"))
        {
            continue;
        }
        let Ok(text) = read_text_file(path) else {
            continue;
        };
        if declares_documentclass(&text) {
            let rel = path.strip_prefix(tree_root).unwrap_or(path).to_path_buf();
            candidates.push(rel);
        }
    }

    // Residual ties resolved by lexical order.
    candidates.sort();

    for name in MAIN_PRIORITY {
        if let Some(hit) = candidates
            .iter()
            .find(|c| c.file_name().is_some_and(|f| f == std::ffi::OsStr::new(name)))
        {
            return Ok(hit.clone());
        }
    }

    candidates
        .into_iter()
        .min_by_key(|c| c.components().count())
        .ok_or(Error::NoMainDocument)
}

/// A file is a candidate iff some line, after discarding full-line comments,
/// contains `\documentclass`.
fn declares_documentclass(text: &str) -> bool {
    text.lines().any(|line| {
        let trimmed = line.trim_start();
        !trimmed.starts_with('%') && trimmed.contains("\\documentclass")
    })
}
