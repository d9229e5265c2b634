//! Import: migrate an unstructured project archive into the canonical layout.
//!
//! Dry-run and commit share one analysis pass; commit additionally stages a
//! canonical tree and renames it into place, so a failed commit never leaves
//! a half-written project. The extraction scratch directory is a
//! [`tempfile::TempDir`] and is deleted on every exit path.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::latex::{
    Metadata, classify_file, detect_main_document, extract_metadata, resolve_directives,
    split_monolithic,
};
use crate::project::{
    self, DefaultTemplate, TemplateProvider, section_file, unique_destination,
};
use crate::report::{MappingReport, MetadataReport};
use crate::resources::{ResourceSet, collect_resources};
use crate::util::{read_text_file, rel_string};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Replace an existing destination wholesale instead of failing.
    pub force: bool,
}

/// Result of a dry run: the full report, no filesystem mutation.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub report: MappingReport,
    pub warnings: Vec<String>,
}

/// Result of a committed import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub project_path: PathBuf,
    pub report: MappingReport,
    pub warnings: Vec<String>,
}

/// Everything analysis decided, with content in memory so commit never
/// re-reads classified files after the scratch tree is gone.
struct Analysis {
    main_rel: PathBuf,
    /// Canonical name to ordered `(source_rel, content)` pairs.
    sections: BTreeMap<&'static str, Vec<(String, String)>>,
    unclassified: Vec<(String, String)>,
    metadata: Metadata,
    resources: ResourceSet,
    warnings: Vec<String>,
}

/// Analyze an archive without writing anything.
pub fn import_dry_run(archive: &Path) -> Result<ImportReport> {
    let scratch = tempfile::tempdir()?;
    let tree_root = extract_archive(archive, scratch.path())?;
    let analysis = analyze(&tree_root)?;
    Ok(ImportReport {
        report: build_report(&analysis),
        warnings: analysis.warnings,
    })
}

/// Import an archive into a canonical project at `dest` using the built-in
/// template.
pub fn import_project(
    archive: &Path,
    dest: &Path,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    import_project_with(archive, dest, options, &DefaultTemplate)
}

/// Import with a caller-supplied skeleton provider.
pub fn import_project_with(
    archive: &Path,
    dest: &Path,
    options: &ImportOptions,
    template: &dyn TemplateProvider,
) -> Result<ImportOutcome> {
    // Destination precondition comes before any extraction work.
    if dest.exists() && !options.force {
        return Err(Error::DestinationExists(dest.to_path_buf()));
    }

    let scratch = tempfile::tempdir()?;
    let tree_root = extract_archive(archive, scratch.path())?;
    let mut analysis = analyze(&tree_root)?;
    let report = build_report(&analysis);
    let mut warnings = std::mem::take(&mut analysis.warnings);

    let project_path = commit(dest, &analysis, &tree_root, template, &mut warnings)?;

    Ok(ImportOutcome {
        project_path,
        report,
        warnings,
    })
}

/// Extract `archive` into `scratch` and return the effective tree root.
///
/// Archives that wrap the whole project in a single top-level directory (as
/// collaborative editors commonly export) are unwrapped transparently.
fn extract_archive(archive: &Path, scratch: &Path) -> Result<PathBuf> {
    if !archive.is_file() {
        return Err(Error::ArchiveNotFound(archive.to_path_buf()));
    }

    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| match e {
        zip::result::ZipError::InvalidArchive(msg) => Error::InvalidArchive(msg.to_string()),
        other => Error::Zip(other),
    })?;
    zip.extract(scratch)?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(scratch)? {
        entries.push(entry?.path());
    }
    if let [only] = entries.as_slice()
        && only.is_dir()
    {
        return Ok(only.clone());
    }
    Ok(scratch.to_path_buf())
}

fn analyze(tree_root: &Path) -> Result<Analysis> {
    let main_rel = detect_main_document(tree_root)?;
    let root_abs = tree_root.join(&main_rel);
    let root_text = read_text_file(&root_abs)?;

    let directives = resolve_directives(&root_abs, tree_root)?;

    let mut warnings = Vec::new();
    let mut sections: BTreeMap<&'static str, Vec<(String, String)>> = BTreeMap::new();
    let mut unclassified: Vec<(String, String)> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    seen.insert(main_rel.clone());

    for directive in &directives {
        if !directive.exists {
            warnings.push(format!(
                "referenced file not found: {}",
                rel_string(&directive.resolved_path)
            ));
            continue;
        }
        let is_tex = directive
            .resolved_path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tex"));
        if !is_tex || !seen.insert(directive.resolved_path.clone()) {
            continue;
        }

        let rel = rel_string(&directive.resolved_path);
        let content = match read_text_file(&tree_root.join(&directive.resolved_path)) {
            Ok(text) => text,
            Err(e) => {
                warnings.push(format!("could not read {rel}: {e}"));
                continue;
            }
        };
        let stem = directive
            .resolved_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match classify_file(&stem, &content) {
            Some(name) => sections.entry(name).or_default().push((rel, content)),
            None => unclassified.push((rel, content)),
        }
    }

    // Fully monolithic document: no referenced file classified either way,
    // so split the root body at its headings instead.
    if sections.is_empty() && unclassified.is_empty() {
        let main_str = rel_string(&main_rel);
        for (name, content) in split_monolithic(&root_text) {
            sections.insert(name, vec![(main_str.clone(), content)]);
        }
    }

    if sections.is_empty() {
        warnings.push("no canonical sections detected".to_string());
    }

    Ok(Analysis {
        main_rel,
        sections,
        unclassified,
        metadata: extract_metadata(&root_text),
        resources: collect_resources(tree_root),
        warnings,
    })
}

fn build_report(analysis: &Analysis) -> MappingReport {
    let sections = analysis
        .sections
        .iter()
        .map(|(name, parts)| {
            (
                name.to_string(),
                parts.iter().map(|(src, _)| src.clone()).collect(),
            )
        })
        .collect();

    let to_strings = |paths: &[PathBuf]| paths.iter().map(|p| rel_string(p)).collect();

    MappingReport {
        main_tex: rel_string(&analysis.main_rel),
        sections,
        metadata: MetadataReport {
            title: analysis.metadata.title.clone(),
            authors_found: !analysis.metadata.authors.is_empty(),
            keywords_found: !analysis.metadata.keywords.is_empty(),
        },
        bib_files: to_strings(&analysis.resources.bibliography),
        images: to_strings(&analysis.resources.images),
        tables: to_strings(&analysis.resources.tables),
        custom_styles: to_strings(&analysis.resources.styles),
        unmapped_tex: analysis.unclassified.iter().map(|(p, _)| p.clone()).collect(),
    }
}

/// Assemble the canonical project in a staging directory, then rename it into
/// place. A `force`'d destination is fully replaced, never patched.
fn commit(
    dest: &Path,
    analysis: &Analysis,
    tree_root: &Path,
    template: &dyn TemplateProvider,
    warnings: &mut Vec<String>,
) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    let staging = dest.with_file_name(format!(".{name}.partial"));

    if staging.exists() {
        std::fs::remove_dir_all(&staging)?;
    }
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&staging)?;

    if let Err(e) = populate(&staging, analysis, tree_root, template, warnings) {
        let _ = std::fs::remove_dir_all(&staging);
        return Err(e);
    }

    if dest.is_dir() {
        std::fs::remove_dir_all(dest)?;
    } else if dest.exists() {
        std::fs::remove_file(dest)?;
    }
    if let Err(e) = std::fs::rename(&staging, dest) {
        let _ = std::fs::remove_dir_all(&staging);
        return Err(e.into());
    }

    Ok(dest.to_path_buf())
}

fn populate(
    root: &Path,
    analysis: &Analysis,
    tree_root: &Path,
    template: &dyn TemplateProvider,
    warnings: &mut Vec<String>,
) -> Result<()> {
    template.materialize(root)?;

    // Non-empty classified sections; absent ones keep the skeleton
    // placeholder. Multiple sources concatenate in discovery order.
    for (name, parts) in &analysis.sections {
        let mut content = parts
            .iter()
            .map(|(_, text)| text.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        content.push('\n');
        std::fs::write(section_file(root, name), content)?;
    }

    let extra_dir = root.join(project::EXTRA_TEX_DIR);
    for (rel, content) in &analysis.unclassified {
        let file_name = Path::new(rel)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed.tex".to_string());
        let dest = unique_destination(&extra_dir, &file_name);
        note_rename(&file_name, &dest, warnings);
        std::fs::write(dest, content)?;
    }

    let copies: [(&[PathBuf], &str); 4] = [
        (&analysis.resources.bibliography, project::BIB_DIR),
        (&analysis.resources.images, project::FIGURES_DIR),
        (&analysis.resources.tables, project::DATA_DIR),
        (&analysis.resources.styles, project::STYLES_DIR),
    ];
    for (paths, dir) in copies {
        let dest_dir = root.join(dir);
        for rel in paths {
            let Some(file_name) = rel.file_name().map(|n| n.to_string_lossy().to_string())
            else {
                continue;
            };
            let dest = unique_destination(&dest_dir, &file_name);
            note_rename(&file_name, &dest, warnings);
            std::fs::copy(tree_root.join(rel), dest)?;
        }
    }

    // Only fields that were actually extracted are written.
    let meta = &analysis.metadata;
    if !meta.title.is_empty() {
        std::fs::write(root.join(project::TITLE_FILE), format!("{}\n", meta.title))?;
    }
    if !meta.authors.is_empty() {
        std::fs::write(root.join(project::AUTHORS_FILE), format!("{}\n", meta.authors))?;
    }
    if !meta.keywords.is_empty() {
        std::fs::write(root.join(project::KEYWORDS_FILE), format!("{}\n", meta.keywords))?;
    }

    Ok(())
}

fn note_rename(original: &str, dest: &Path, warnings: &mut Vec<String>) {
    if let Some(stored) = dest.file_name()
        && stored != std::ffi::OsStr::new(original)
    {
        warnings.push(format!(
            "duplicate destination name {original}, stored as {}",
            stored.to_string_lossy()
        ));
    }
}
