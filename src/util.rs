//! Shared helpers: encoding-tolerant text access and path formatting.

use std::borrow::Cow;
use std::path::Path;

/// Decode bytes to a string, handling various encodings.
///
/// Tries UTF-8 first (BOM handled automatically by encoding_rs); if the input
/// is malformed, falls back to Windows-1252 (superset of ISO-8859-1, common in
/// LaTeX sources produced by older editors).
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read a file as text with encoding fallback.
pub fn read_text_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_text(&bytes).into_owned())
}

/// Render a relative path with forward slashes (archive/report paths, not
/// filesystem paths).
pub fn rel_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
