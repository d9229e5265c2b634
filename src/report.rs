//! Serializable snapshot of an import's structural decisions.
//!
//! All paths are relative to the source tree root, forward-slashed, so the
//! report is host-independent and stable across reruns of the same archive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything the import pipeline decided, dry-run and commit alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    /// Detected main document.
    pub main_tex: String,
    /// Canonical section name to the ordered source files that fed it.
    pub sections: BTreeMap<String, Vec<String>>,
    pub metadata: MetadataReport,
    pub bib_files: Vec<String>,
    pub images: Vec<String>,
    pub tables: Vec<String>,
    pub custom_styles: Vec<String>,
    /// `.tex` files that matched no canonical name; preserved, never dropped.
    pub unmapped_tex: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataReport {
    pub title: String,
    pub authors_found: bool,
    pub keywords_found: bool,
}
