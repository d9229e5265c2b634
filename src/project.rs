//! Canonical project layout and the template-provider seam.
//!
//! The rest of the toolchain assumes this fixed, section-addressable shape;
//! import writes into it and export reads back out of it.

use std::io;
use std::path::{Path, PathBuf};

use crate::latex::CANONICAL_SECTIONS;

/// Shared-metadata directory; its presence marks a canonical project.
pub const META_DIR: &str = "paper_meta";
pub const SECTIONS_DIR: &str = "sections";
pub const BIB_DIR: &str = "bib";
pub const FIGURES_DIR: &str = "figures";
pub const DATA_DIR: &str = "data";
pub const STYLES_DIR: &str = "styles";
/// Unclassified source files land here rather than being dropped.
pub const EXTRA_TEX_DIR: &str = "extra_tex";
pub const TEMPLATE_DIR: &str = "template";
/// Base template consumed by export for the preamble.
pub const BASE_TEMPLATE: &str = "template/base.tex";

pub const TITLE_FILE: &str = "paper_meta/title.txt";
pub const AUTHORS_FILE: &str = "paper_meta/authors.tex";
pub const KEYWORDS_FILE: &str = "paper_meta/keywords.txt";

pub fn is_canonical_project(root: &Path) -> bool {
    root.join(META_DIR).is_dir()
}

pub fn section_file(root: &Path, name: &str) -> PathBuf {
    root.join(SECTIONS_DIR).join(format!("{name}.tex"))
}

/// Materializes a blank canonical skeleton. Import delegates skeleton
/// creation here so alternative templates (journal classes, institutional
/// boilerplate) can be plugged in.
pub trait TemplateProvider {
    fn materialize(&self, root: &Path) -> io::Result<()>;
}

/// Minimal built-in skeleton: empty resource directories, comment-only
/// section placeholders, and a plain `article` base template.
pub struct DefaultTemplate;

const DEFAULT_BASE_TEMPLATE: &str = "\\documentclass[11pt]{article}\n\
\\usepackage{graphicx}\n\
\\usepackage{amsmath}\n\
\\begin{document}\n\
\\end{document}\n";

impl TemplateProvider for DefaultTemplate {
    fn materialize(&self, root: &Path) -> io::Result<()> {
        for dir in [
            META_DIR,
            SECTIONS_DIR,
            BIB_DIR,
            FIGURES_DIR,
            DATA_DIR,
            STYLES_DIR,
            EXTRA_TEX_DIR,
            TEMPLATE_DIR,
        ] {
            std::fs::create_dir_all(root.join(dir))?;
        }

        for name in CANONICAL_SECTIONS {
            std::fs::write(
                section_file(root, name),
                format!("% {name}: not yet populated\n"),
            )?;
        }

        std::fs::write(root.join(BASE_TEMPLATE), DEFAULT_BASE_TEMPLATE)?;
        Ok(())
    }
}

/// First destination name under `dir` that does not collide with an existing
/// file: `name.ext`, then `name_1.ext`, `name_2.ext`, ...
///
/// A monotonic counter is enough here: import only ever copies one way, so
/// there is no rename window to protect.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((s, e)) => (s, Some(e)),
        None => (file_name, None),
    };

    let mut counter = 1;
    loop {
        let name = match ext {
            Some(e) => format!("{stem}_{counter}.{e}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = dir.join(&name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_template_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        DefaultTemplate.materialize(dir.path()).unwrap();

        assert!(is_canonical_project(dir.path()));
        for name in CANONICAL_SECTIONS {
            assert!(section_file(dir.path(), name).is_file());
        }
        assert!(dir.path().join(BASE_TEMPLATE).is_file());
    }

    #[test]
    fn test_unique_destination_counter() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_destination(dir.path(), "refs.bib"),
            dir.path().join("refs.bib")
        );

        fs::write(dir.path().join("refs.bib"), b"a").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "refs.bib"),
            dir.path().join("refs_1.bib")
        );

        fs::write(dir.path().join("refs_1.bib"), b"b").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "refs.bib"),
            dir.path().join("refs_2.bib")
        );
    }

    #[test]
    fn test_unique_destination_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Makefile"), b"a").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "Makefile"),
            dir.path().join("Makefile_1")
        );
    }
}
