//! texrad - LaTeX project structure migration

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use texrad::{ImportOptions, export_dry_run, export_project, import_dry_run, import_project};

#[derive(Parser)]
#[command(name = "texrad")]
#[command(version, about = "LaTeX project structure migration", long_about = None)]
#[command(after_help = "EXAMPLES:
    texrad inspect upload.zip              Analyze an archive, print the mapping
    texrad import upload.zip projects/p1   Migrate into the canonical layout
    texrad export projects/p1 -o out.zip   Flatten back to a single archive")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Import a project archive into the canonical layout
    Import {
        /// Input ZIP archive
        archive: PathBuf,
        /// Destination project directory
        dest: PathBuf,
        /// Analyze and report only, write nothing
        #[arg(long)]
        dry_run: bool,
        /// Replace an existing destination
        #[arg(long)]
        force: bool,
    },
    /// Export a canonical project to a flat ZIP archive
    Export {
        /// Canonical project directory
        project: PathBuf,
        /// Output archive path (default: <project>_export.zip)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Plan and report only, write nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Dry-run import an archive and print its structural mapping
    Inspect {
        /// Input ZIP archive
        archive: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Import {
            archive,
            dest,
            dry_run,
            force,
        } => run_import(&archive, &dest, dry_run, force, cli.json),
        Command::Export {
            project,
            out,
            dry_run,
        } => run_export(&project, out.as_deref(), dry_run, cli.json),
        Command::Inspect { archive } => run_inspect(&archive, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "success": false, "error": e.to_string() }));
            } else {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run_import(
    archive: &std::path::Path,
    dest: &std::path::Path,
    dry_run: bool,
    force: bool,
    as_json: bool,
) -> texrad::Result<()> {
    if dry_run {
        let dry = import_dry_run(archive)?;
        if as_json {
            println!(
                "{}",
                json!({
                    "success": true,
                    "mapping_report": dry.report,
                    "warnings": dry.warnings,
                })
            );
        } else {
            print_report(&dry.report);
            print_warnings(&dry.warnings);
        }
        return Ok(());
    }

    let outcome = import_project(archive, dest, &ImportOptions { force })?;
    if as_json {
        println!(
            "{}",
            json!({
                "success": true,
                "project_path": outcome.project_path,
                "mapping_report": outcome.report,
                "warnings": outcome.warnings,
            })
        );
    } else {
        println!("Imported into {}", outcome.project_path.display());
        print_report(&outcome.report);
        print_warnings(&outcome.warnings);
    }
    Ok(())
}

fn run_export(
    project: &std::path::Path,
    out: Option<&std::path::Path>,
    dry_run: bool,
    as_json: bool,
) -> texrad::Result<()> {
    if dry_run {
        let plan = export_dry_run(project)?;
        if as_json {
            println!(
                "{}",
                json!({
                    "success": true,
                    "file_count": plan.files_included.len(),
                    "files_included": plan.files_included,
                    "warnings": plan.warnings,
                })
            );
        } else {
            println!("Would export {} files:", plan.files_included.len());
            for name in &plan.files_included {
                println!("  {name}");
            }
            print_warnings(&plan.warnings);
        }
        return Ok(());
    }

    let outcome = export_project(project, out)?;
    if as_json {
        println!(
            "{}",
            json!({
                "success": true,
                "zip_path": outcome.zip_path,
                "file_count": outcome.file_count,
                "files_included": outcome.files_included,
                "warnings": outcome.warnings,
            })
        );
    } else {
        println!(
            "Exported {} files to {}",
            outcome.file_count,
            outcome.zip_path.display()
        );
        print_warnings(&outcome.warnings);
    }
    Ok(())
}

fn run_inspect(archive: &std::path::Path, as_json: bool) -> texrad::Result<()> {
    let dry = import_dry_run(archive)?;
    if as_json {
        println!(
            "{}",
            json!({
                "success": true,
                "mapping_report": dry.report,
                "warnings": dry.warnings,
            })
        );
    } else {
        println!("File: {}", archive.display());
        print_report(&dry.report);
        print_warnings(&dry.warnings);
    }
    Ok(())
}

fn print_report(report: &texrad::MappingReport) {
    println!("Main document: {}", report.main_tex);
    if !report.metadata.title.is_empty() {
        println!("Title: {}", report.metadata.title);
    }
    for (name, sources) in &report.sections {
        println!("  {name}: {}", sources.join(", "));
    }
    if !report.unmapped_tex.is_empty() {
        println!("Unclassified: {}", report.unmapped_tex.join(", "));
    }
    println!(
        "Resources: {} bib, {} images, {} tables, {} styles",
        report.bib_files.len(),
        report.images.len(),
        report.tables.len(),
        report.custom_styles.len()
    );
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}
