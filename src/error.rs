//! Error types for texrad operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during project import or export.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("Not a valid project archive: {0}")]
    InvalidArchive(String),

    #[error("No compilable main document found (no .tex file declares \\documentclass)")]
    NoMainDocument,

    #[error("Destination already exists: {0} (pass force to replace)")]
    DestinationExists(PathBuf),

    #[error("Not a canonical project (missing paper_meta/ directory): {0}")]
    NotCanonicalProject(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
