//! Preamble metadata extraction.

/// Title, author block, and keywords pulled from a root document's preamble.
/// Absent fields are empty strings, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub authors: String,
    pub keywords: String,
}

/// Extract metadata from a root document's text.
///
/// Brace matching stops at the first closing brace; nested braces in titles
/// or author blocks are not specially handled.
pub fn extract_metadata(text: &str) -> Metadata {
    Metadata {
        title: brace_argument(text, "\\title{").unwrap_or_default(),
        authors: brace_argument(text, "\\author{").unwrap_or_default(),
        keywords: extract_keywords(text),
    }
}

fn brace_argument(text: &str, command: &str) -> Option<String> {
    let start = text.find(command)? + command.len();
    let rest = &text[start..];
    let end = rest.find('}')?;
    Some(rest[..end].trim().to_string())
}

/// Keywords come from the first `keyword`/`keywords` environment, else the
/// first `\keywords{...}` command.
fn extract_keywords(text: &str) -> String {
    for env in ["keywords", "keyword"] {
        let begin = format!("\\begin{{{env}}}");
        let end = format!("\\end{{{env}}}");
        if let Some(start) = text.find(&begin) {
            let body_start = start + begin.len();
            if let Some(len) = text[body_start..].find(&end) {
                return text[body_start..body_start + len].trim().to_string();
            }
        }
    }

    brace_argument(text, "\\keywords{").unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_author() {
        let doc = "\\documentclass{article}\n\\title{Test Paper Title}\n\\author{John Doe}\n";
        let meta = extract_metadata(doc);
        assert_eq!(meta.title, "Test Paper Title");
        assert_eq!(meta.authors, "John Doe");
        assert_eq!(meta.keywords, "");
    }

    #[test]
    fn test_first_match_wins() {
        let doc = "\\title{First}\n\\title{Second}\n";
        assert_eq!(extract_metadata(doc).title, "First");
    }

    #[test]
    fn test_keywords_environment_preferred() {
        let doc = "\\begin{keywords}\nalpha, beta\n\\end{keywords}\n\\keywords{ignored}\n";
        assert_eq!(extract_metadata(doc).keywords, "alpha, beta");
    }

    #[test]
    fn test_keywords_command_fallback() {
        let doc = "\\keywords{gamma, delta}\n";
        assert_eq!(extract_metadata(doc).keywords, "gamma, delta");
    }

    #[test]
    fn test_absent_fields_are_empty() {
        let meta = extract_metadata("plain text, no preamble");
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn test_nested_braces_stop_at_first_close() {
        // Documented limitation: brace matching is not balanced.
        let doc = "\\title{The \\emph{Great} Paper}";
        assert_eq!(extract_metadata(doc).title, "The \\emph{Great");
    }
}
