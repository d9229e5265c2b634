//! Mapping files and heading-delimited spans to canonical IMRAD sections.
//!
//! Classification is two-stage: the filename heuristic runs first and wins
//! outright; only when the stem matches nothing is the file's first
//! `\section` heading consulted. The inline-split fallback handles fully
//! monolithic documents with no classifiable referenced files.

use std::collections::BTreeMap;

/// Canonical section names in manuscript order.
pub const CANONICAL_SECTIONS: [&str; 5] =
    ["abstract", "introduction", "methods", "results", "discussion"];

/// Keyword fragments per canonical name. Process-wide immutable configuration;
/// iteration order is match order.
const SECTION_KEYWORDS: [(&str, &[&str]); 5] = [
    ("abstract", &["abstract", "summary"]),
    ("introduction", &["introduction", "background"]),
    ("methods", &["methods", "materials", "experimental", "procedure"]),
    ("results", &["results", "findings", "observations"]),
    ("discussion", &["discussion", "conclusion", "implications"]),
];

/// Match arbitrary text (a file stem or a heading) against the keyword table.
/// First table entry with a matching fragment wins.
fn match_keywords(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    SECTION_KEYWORDS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lower.contains(f)))
        .map(|(name, _)| *name)
}

/// Classify a referenced file by stem, then by its first `\section` heading.
pub fn classify_file(stem: &str, content: &str) -> Option<&'static str> {
    match_keywords(stem).or_else(|| first_section_heading(content).and_then(match_keywords))
}

/// Heading text of the first `\section{...}` or `\section*{...}`.
fn first_section_heading(text: &str) -> Option<&str> {
    section_headings(text).next().map(|(_, heading)| heading)
}

/// Iterate `(command_offset, heading_text)` for every
/// `\section{}`/`\section*{}` occurrence.
fn section_headings(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut from = 0;
    std::iter::from_fn(move || {
        while let Some(pos) = text[from..].find("\\section") {
            let cmd_start = from + pos;
            let mut cursor = cmd_start + "\\section".len();
            if text[cursor..].starts_with('*') {
                cursor += 1;
            }
            from = cmd_start + "\\section".len();
            if !text[cursor..].starts_with('{') {
                continue;
            }
            let arg_start = cursor + 1;
            let Some(len) = text[arg_start..].find('}') else {
                continue;
            };
            return Some((cmd_start, &text[arg_start..arg_start + len]));
        }
        None
    })
}

/// Split a monolithic document at `\section` boundaries and classify each
/// span by its heading.
///
/// Spans mapping to the same canonical name are concatenated in document
/// order with a blank-line separator; each kept span includes its heading
/// line so the content stays compilable. An explicit `abstract` environment
/// is captured independently, only when heading-splitting found no abstract.
pub fn split_monolithic(text: &str) -> BTreeMap<&'static str, String> {
    // Headings past \end{document} are dead text to LaTeX; splitting at them
    // would run spans backwards across the marker.
    let end_limit = body_end(text);
    let boundaries: Vec<(usize, &str)> = section_headings(text)
        .take_while(|(start, _)| *start < end_limit)
        .collect();

    let mut sections: BTreeMap<&'static str, String> = BTreeMap::new();
    for (i, (start, heading)) in boundaries.iter().enumerate() {
        let Some(name) = match_keywords(heading) else {
            continue;
        };
        let end = boundaries
            .get(i + 1)
            .map(|(next, _)| *next)
            .unwrap_or(end_limit);
        let span = text[*start..end].trim();
        if span.is_empty() {
            continue;
        }
        match sections.get_mut(name) {
            Some(existing) => {
                existing.push_str("\n\n");
                existing.push_str(span);
            }
            None => {
                sections.insert(name, span.to_string());
            }
        }
    }

    if !sections.contains_key("abstract")
        && let Some(abstract_body) = abstract_environment(text)
    {
        sections.insert("abstract", abstract_body);
    }

    sections
}

/// Offset of `\end{document}`, or EOF when absent.
fn body_end(text: &str) -> usize {
    text.find("\\end{document}").unwrap_or(text.len())
}

fn abstract_environment(text: &str) -> Option<String> {
    let start = text.find("\\begin{abstract}")? + "\\begin{abstract}".len();
    let len = text[start..].find("\\end{abstract}")?;
    let body = text[start..start + len].trim();
    (!body.is_empty()).then(|| body.to_string())
}
