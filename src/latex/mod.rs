//! LaTeX source analysis: directive resolution, main-document detection,
//! metadata extraction, and section classification.

mod classify;
mod detect;
mod directive;
mod metadata;

pub use classify::{CANONICAL_SECTIONS, classify_file, split_monolithic};
pub use detect::detect_main_document;
pub use directive::{DirectiveCommand, InputDirective, MAX_INPUT_DEPTH, resolve_directives};
pub use metadata::{Metadata, extract_metadata};
