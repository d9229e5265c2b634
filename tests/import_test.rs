mod common;

use std::path::Path;

use common::make_zip;
use texrad::{Error, ImportOptions, import_dry_run, import_project};

const MAIN_WITH_INPUTS: &str = "\\documentclass{article}\n\
\\title{Test Paper Title}\n\
\\author{John Doe}\n\
\\begin{document}\n\
\\input{sections/introduction}\n\
\\input{sections/methods}\n\
\\input{sections/results}\n\
\\input{sections/discussion}\n\
\\end{document}\n";

fn structured_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("main.tex", MAIN_WITH_INPUTS),
        ("sections/introduction.tex", "\\section{Introduction}\nWe begin.\n"),
        ("sections/methods.tex", "\\section{Methods}\nWe measure.\n"),
        ("sections/results.tex", "\\section{Results}\nWe find.\n"),
        ("sections/discussion.tex", "\\section{Discussion}\nWe conclude.\n"),
        ("refs.bib", "@article{key, title={A}}\n"),
        ("images/fig1.png", "not really a png"),
    ]
}

#[test]
fn test_scenario_structured_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    make_zip(&archive, &structured_entries());

    let dry = import_dry_run(&archive).expect("dry run succeeds");
    let report = dry.report;

    assert_eq!(report.main_tex, "main.tex");
    for name in ["introduction", "methods", "results", "discussion"] {
        assert!(report.sections.contains_key(name), "missing {name}");
    }
    assert_eq!(report.sections["introduction"], vec!["sections/introduction.tex"]);
    assert_eq!(report.bib_files, vec!["refs.bib"]);
    assert_eq!(report.images, vec!["images/fig1.png"]);
    assert_eq!(report.metadata.title, "Test Paper Title");
    assert!(report.metadata.authors_found);
    assert!(!report.metadata.keywords_found);
    assert!(report.unmapped_tex.is_empty());
}

#[test]
fn test_scenario_inline_only() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mono.zip");
    make_zip(
        &archive,
        &[(
            "main.tex",
            "\\documentclass{article}\n\\begin{document}\n\
             \\section{Introduction}\nintro body\n\
             \\section{Methods}\nmethods body\n\
             \\section{Conclusion}\nconclusion body\n\
             \\end{document}\n",
        )],
    );

    let dry = import_dry_run(&archive).unwrap();
    let report = dry.report;

    assert_eq!(report.sections["introduction"], vec!["main.tex"]);
    assert_eq!(report.sections["methods"], vec!["main.tex"]);
    // Conclusion content classifies under discussion.
    assert_eq!(report.sections["discussion"], vec!["main.tex"]);
    assert!(!report.sections.contains_key("results"));
}

#[test]
fn test_dry_run_invariance() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    make_zip(&archive, &structured_entries());

    let first = import_dry_run(&archive).unwrap();
    let second = import_dry_run(&archive).unwrap();
    assert_eq!(first.report, second.report);
    assert_eq!(first.warnings, second.warnings);

    // Nothing persisted next to the archive.
    let residents: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(residents.len(), 1);
}

#[test]
fn test_no_main_document_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("bad.zip");
    make_zip(&archive, &[("intro.tex", "just text, no class\n")]);

    assert!(matches!(
        import_dry_run(&archive),
        Err(Error::NoMainDocument)
    ));
}

#[test]
fn test_missing_archive() {
    assert!(matches!(
        import_dry_run(Path::new("/nonexistent/upload.zip")),
        Err(Error::ArchiveNotFound(_))
    ));
}

#[test]
fn test_invalid_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("garbage.zip");
    std::fs::write(&archive, b"this is not a zip file").unwrap();

    assert!(matches!(
        import_dry_run(&archive),
        Err(Error::InvalidArchive(_))
    ));
}

#[test]
fn test_commit_builds_canonical_tree() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    // Reference an extra file so it gets discovered and preserved as
    // unclassified.
    let main = MAIN_WITH_INPUTS.replace(
        "\\end{document}",
        "\\input{appendix}\n\\end{document}",
    );
    let mut entries: Vec<(&str, &str)> = structured_entries();
    entries[0] = ("main.tex", &main);
    entries.push(("appendix.tex", "\\section{Proofs}\nextra material\n"));
    make_zip(&archive, &entries);

    let dest = dir.path().join("project");
    let outcome = import_project(&archive, &dest, &ImportOptions::default()).unwrap();

    assert_eq!(outcome.project_path, dest);
    let intro = std::fs::read_to_string(dest.join("sections/introduction.tex")).unwrap();
    assert!(intro.contains("We begin."));
    // Absent abstract keeps the skeleton placeholder.
    let abstract_file = std::fs::read_to_string(dest.join("sections/abstract.tex")).unwrap();
    assert!(abstract_file.starts_with('%'));

    assert!(dest.join("bib/refs.bib").is_file());
    assert!(dest.join("figures/fig1.png").is_file());
    assert!(dest.join("extra_tex/appendix.tex").is_file());
    assert_eq!(
        std::fs::read_to_string(dest.join("paper_meta/title.txt")).unwrap(),
        "Test Paper Title\n"
    );
    assert!(dest.join("paper_meta/authors.tex").is_file());
    // Keywords were not extracted, so the file is not written.
    assert!(!dest.join("paper_meta/keywords.txt").exists());
    assert_eq!(outcome.report.unmapped_tex, vec!["appendix.tex"]);
}

#[test]
fn test_collision_safe_resource_copies() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    make_zip(
        &archive,
        &[
            ("main.tex", MAIN_WITH_INPUTS),
            ("sections/introduction.tex", "\\section{Introduction}\nbody\n"),
            ("sections/methods.tex", "m\n"),
            ("sections/results.tex", "r\n"),
            ("sections/discussion.tex", "d\n"),
            ("refs.bib", "@article{a}\n"),
            ("old/refs.bib", "@article{b}\n"),
        ],
    );

    let dest = dir.path().join("project");
    let outcome = import_project(&archive, &dest, &ImportOptions::default()).unwrap();

    assert!(dest.join("bib/refs.bib").is_file());
    assert!(dest.join("bib/refs_1.bib").is_file());
    assert!(
        outcome
            .warnings
            .iter()
            .any(|w| w.contains("refs_1.bib")),
        "expected a duplicate-name warning, got {:?}",
        outcome.warnings
    );
}

#[test]
fn test_destination_guard_and_force() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    make_zip(&archive, &structured_entries());

    let dest = dir.path().join("project");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("unrelated.txt"), b"precious").unwrap();

    assert!(matches!(
        import_project(&archive, &dest, &ImportOptions::default()),
        Err(Error::DestinationExists(_))
    ));
    // The guarded destination was not touched.
    assert!(dest.join("unrelated.txt").is_file());

    let outcome = import_project(&archive, &dest, &ImportOptions { force: true }).unwrap();
    assert_eq!(outcome.project_path, dest);
    // Fully replaced, never patched in place.
    assert!(!dest.join("unrelated.txt").exists());
    assert!(dest.join("sections/introduction.tex").is_file());
}

#[test]
fn test_missing_referenced_file_is_soft() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("upload.zip");
    make_zip(
        &archive,
        &[
            (
                "main.tex",
                "\\documentclass{article}\n\\begin{document}\n\
                 \\input{sections/introduction}\n\\input{ghost}\n\\end{document}\n",
            ),
            ("sections/introduction.tex", "\\section{Introduction}\nbody\n"),
        ],
    );

    let dry = import_dry_run(&archive).unwrap();
    assert!(dry.report.sections.contains_key("introduction"));
    assert!(
        dry.warnings.iter().any(|w| w.contains("ghost.tex")),
        "expected missing-file warning, got {:?}",
        dry.warnings
    );
}

#[test]
fn test_wrapper_directory_unwrapped() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("wrapped.zip");
    make_zip(
        &archive,
        &[
            ("My Paper/main.tex", MAIN_WITH_INPUTS),
            ("My Paper/sections/introduction.tex", "\\section{Introduction}\nbody\n"),
            ("My Paper/refs.bib", "@article{a}\n"),
        ],
    );

    let dry = import_dry_run(&archive).unwrap();
    assert_eq!(dry.report.main_tex, "main.tex");
    assert_eq!(dry.report.bib_files, vec!["refs.bib"]);
}
