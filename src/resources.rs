//! Tree-wide enumeration of bibliography, image, table-data, and style files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Image extensions recognized as figure sources.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "pdf", "eps", "svg", "gif", "bmp", "tif", "tiff",
];

/// PDF stems treated as compiled output rather than source figures.
const COMPILED_PDF_STEMS: &[&str] = &["main", "output", "manuscript", "paper"];

/// Style/class extensions.
pub const STYLE_EXTENSIONS: &[&str] = &["cls", "sty", "bst"];

/// Four disjoint resource lists, paths relative to the scanned root, each
/// sorted for reproducibility.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    pub bibliography: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
    pub tables: Vec<PathBuf>,
    pub styles: Vec<PathBuf>,
}

/// Enumerate resources under `tree_root`.
pub fn collect_resources(tree_root: &Path) -> ResourceSet {
    let mut set = ResourceSet::default();

    for entry in WalkDir::new(tree_root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            continue;
        };
        let rel = path.strip_prefix(tree_root).unwrap_or(path).to_path_buf();

        if ext == "bib" {
            set.bibliography.push(rel);
        } else if ext == "csv" || ext == "tsv" {
            set.tables.push(rel);
        } else if STYLE_EXTENSIONS.contains(&ext.as_str()) {
            set.styles.push(rel);
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            if ext == "pdf" && is_compiled_output(path) {
                continue;
            }
            set.images.push(rel);
        }
    }

    set.bibliography.sort();
    set.images.sort();
    set.tables.sort();
    set.styles.sort();
    set
}

/// PDFs named like rendered outputs are skipped so a previous compile run is
/// not re-imported as a source figure.
fn is_compiled_output(path: &Path) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .is_some_and(|stem| COMPILED_PDF_STEMS.contains(&stem.as_str()))
}
