//! Export: flatten a canonical project back into a single-root archive.
//!
//! The inverse of import. No scratch directory: the member list is built in
//! memory as ordered `(source, archive name)` pairs, then streamed into the
//! ZIP in one pass.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::latex::CANONICAL_SECTIONS;
use crate::project::{self, is_canonical_project, section_file};
use crate::resources::STYLE_EXTENSIONS;
use crate::util::read_text_file;

const DEFAULT_PREAMBLE: &str = "\\documentclass[11pt]{article}\n\\usepackage{graphicx}\n";

const BIB_FOOTER: &str = "\n\\bibliographystyle{unsrt}\n\\bibliography{references}\n\n\\end{document}\n";

/// A file scheduled for inclusion in the export archive.
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub source: PathBuf,
    pub name: String,
}

/// Everything export decided; dry run returns this without writing a ZIP.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Synthesized root document.
    pub root_tex: String,
    /// Concatenated bibliography, when the project has any `.bib` files.
    /// Deduplication is a separate merge utility's job, not done here.
    pub merged_bib: Option<String>,
    pub members: Vec<ArchiveMember>,
    /// Archive names in final order, including the synthesized entries.
    pub files_included: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of a committed export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub zip_path: PathBuf,
    pub file_count: usize,
    pub files_included: Vec<String>,
    pub warnings: Vec<String>,
}

/// Plan an export without writing anything.
pub fn export_dry_run(project: &Path) -> Result<ExportPlan> {
    plan_export(project)
}

/// Export `project` to a ZIP at `zip_path`, or `<name>_export.zip` next to
/// the project when no path is given.
pub fn export_project(project: &Path, zip_path: Option<&Path>) -> Result<ExportOutcome> {
    let plan = plan_export(project)?;

    let zip_path = match zip_path {
        Some(p) => p.to_path_buf(),
        None => default_zip_path(project),
    };

    let file = File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("main.tex", options)?;
    zip.write_all(plan.root_tex.as_bytes())?;

    if let Some(ref bib) = plan.merged_bib {
        zip.start_file("references.bib", options)?;
        zip.write_all(bib.as_bytes())?;
    }

    for member in &plan.members {
        let data = std::fs::read(&member.source)?;
        zip.start_file(member.name.as_str(), options)?;
        zip.write_all(&data)?;
    }

    zip.finish()?;

    Ok(ExportOutcome {
        zip_path,
        file_count: plan.files_included.len(),
        files_included: plan.files_included,
        warnings: plan.warnings,
    })
}

fn default_zip_path(project: &Path) -> PathBuf {
    let name = project
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    match project.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(format!("{name}_export.zip"))
        }
        _ => PathBuf::from(format!("{name}_export.zip")),
    }
}

fn plan_export(project: &Path) -> Result<ExportPlan> {
    if !is_canonical_project(project) {
        return Err(Error::NotCanonicalProject(project.to_path_buf()));
    }

    let mut warnings = Vec::new();
    let mut members: Vec<ArchiveMember> = Vec::new();

    // Populated canonical sections in fixed manuscript order.
    let mut populated: Vec<&'static str> = Vec::new();
    for name in CANONICAL_SECTIONS {
        let path = section_file(project, name);
        if path.is_file() && has_content(&path) {
            populated.push(name);
            members.push(ArchiveMember {
                source: path,
                name: format!("sections/{name}.tex"),
            });
        }
    }
    if populated.is_empty() {
        warnings.push("no populated sections to export".to_string());
    }

    let root_tex = synthesize_root(project, &populated)?;
    let merged_bib = merge_bibliography(project)?;

    let mut used_names: HashSet<String> = members.iter().map(|m| m.name.clone()).collect();

    // Figures: raw and pre-compiled variants alike, flattened under images/.
    let mut figures: Vec<PathBuf> = WalkDir::new(project.join(project::FIGURES_DIR))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    figures.sort();
    for source in figures {
        let name = archive_name(&source, "images/", &mut used_names);
        members.push(ArchiveMember { source, name });
    }

    // Custom styles travel flat so the root document finds them.
    let mut styles: Vec<PathBuf> = std::fs::read_dir(project.join(project::STYLES_DIR))
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension().is_some_and(|e| {
                            STYLE_EXTENSIONS.contains(&e.to_string_lossy().to_lowercase().as_str())
                        })
                })
                .collect()
        })
        .unwrap_or_default();
    styles.sort();
    for source in styles {
        let name = archive_name(&source, "", &mut used_names);
        members.push(ArchiveMember { source, name });
    }

    let mut files_included = vec!["main.tex".to_string()];
    if merged_bib.is_some() {
        files_included.push("references.bib".to_string());
    }
    files_included.extend(members.iter().map(|m| m.name.clone()));

    Ok(ExportPlan {
        root_tex,
        merged_bib,
        members,
        files_included,
        warnings,
    })
}

/// Build the root document: base-template preamble, populated metadata, one
/// `\input` per populated section, fixed bibliography footer.
fn synthesize_root(project: &Path, populated: &[&'static str]) -> Result<String> {
    let base = project.join(project::BASE_TEMPLATE);
    let preamble = if base.is_file() {
        let text = read_text_file(&base)?;
        match text.find("\\begin{document}") {
            Some(pos) => text[..pos].to_string(),
            None => text,
        }
    } else {
        DEFAULT_PREAMBLE.to_string()
    };

    let title = read_meta(project, project::TITLE_FILE);
    let authors = read_meta(project, project::AUTHORS_FILE);

    let mut root = preamble;
    if !root.ends_with('\n') {
        root.push('\n');
    }
    if !title.is_empty() {
        root.push_str(&format!("\\title{{{title}}}\n"));
    }
    if !authors.is_empty() {
        root.push_str(&format!("\\author{{{authors}}}\n"));
    }
    root.push_str("\\begin{document}\n");
    if !title.is_empty() {
        root.push_str("\\maketitle\n");
    }
    root.push('\n');
    for name in populated {
        root.push_str(&format!("\\input{{sections/{name}}}\n"));
    }
    root.push_str(BIB_FOOTER);
    Ok(root)
}

fn read_meta(project: &Path, rel: &str) -> String {
    let path = project.join(rel);
    if path.is_file() {
        read_text_file(&path)
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    } else {
        String::new()
    }
}

/// Concatenate every bibliography file in canonical order.
fn merge_bibliography(project: &Path) -> Result<Option<String>> {
    let bib_dir = project.join(project::BIB_DIR);
    let mut paths: Vec<PathBuf> = match std::fs::read_dir(&bib_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("bib")))
            .collect(),
        Err(_) => return Ok(None),
    };
    if paths.is_empty() {
        return Ok(None);
    }
    paths.sort();

    let mut merged = String::new();
    for path in paths {
        let text = read_text_file(&path)?;
        if !merged.is_empty() {
            merged.push_str("\n\n");
        }
        merged.push_str(text.trim_end());
    }
    merged.push('\n');
    Ok(Some(merged))
}

/// A section file is populated when any line carries more than a comment.
fn has_content(path: &Path) -> bool {
    read_text_file(path).is_ok_and(|text| {
        text.lines().any(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('%')
        })
    })
}

fn archive_name(source: &Path, prefix: &str, used: &mut HashSet<String>) -> String {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let candidate = format!("{prefix}{file_name}");
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((s, e)) => (s, Some(e)),
        None => (file_name.as_str(), None),
    };
    let mut counter = 1;
    loop {
        let name = match ext {
            Some(e) => format!("{prefix}{stem}_{counter}.{e}"),
            None => format!("{prefix}{stem}_{counter}"),
        };
        if used.insert(name.clone()) {
            return name;
        }
        counter += 1;
    }
}
