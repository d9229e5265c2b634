//! # texrad
//!
//! Bidirectional structure migration for LaTeX manuscript projects.
//!
//! ## Features
//!
//! - Import an arbitrary project archive (as exported by a collaborative
//!   editor) into a canonical, section-addressable layout
//! - Classify content into the five IMRAD sections (abstract, introduction,
//!   methods, results, discussion) by filename, then heading, with an
//!   inline-split fallback for monolithic documents
//! - Export the canonical project back to a flat single-root archive
//! - Dry-run both directions: full analysis, structured report, no writes
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use texrad::{import_dry_run, import_project, export_project, ImportOptions};
//!
//! // Inspect an archive without touching the filesystem
//! let dry = import_dry_run(Path::new("upload.zip"))?;
//! println!("main document: {}", dry.report.main_tex);
//!
//! // Migrate it into the canonical layout
//! let outcome = import_project(
//!     Path::new("upload.zip"),
//!     Path::new("projects/paper"),
//!     &ImportOptions::default(),
//! )?;
//!
//! // And flatten it back out
//! export_project(&outcome.project_path, None)?;
//! # Ok::<(), texrad::Error>(())
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod latex;
pub mod project;
pub mod report;
pub mod resources;
pub(crate) mod util;

pub use error::{Error, Result};
pub use export::{ExportOutcome, ExportPlan, export_dry_run, export_project};
pub use import::{
    ImportOptions, ImportOutcome, ImportReport, import_dry_run, import_project,
    import_project_with,
};
pub use report::{MappingReport, MetadataReport};
