//! Recursive resolution of `\input`/`\include` directives.
//!
//! Produces a pre-order, document-order list of every directive reachable from
//! a root document. A file referenced more than once is emitted once per
//! textual occurrence but only recursed into the first time; recursion depth
//! is capped so malformed or circular include graphs terminate.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use memchr::memchr_iter;

use crate::error::Result;
use crate::util::read_text_file;

/// Maximum include nesting explored below the root document.
pub const MAX_INPUT_DEPTH: usize = 10;

/// Which command referenced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveCommand {
    Input,
    Include,
}

/// A single resolved `\input{}`/`\include{}` occurrence.
#[derive(Debug, Clone)]
pub struct InputDirective {
    pub command: DirectiveCommand,
    /// The raw argument as written in the source.
    pub argument: String,
    /// Target path relative to the source tree root, `.tex` appended when the
    /// argument had no extension.
    pub resolved_path: PathBuf,
    /// Whether the target exists on disk. Missing targets are still emitted
    /// for diagnostics, never recursed into.
    pub exists: bool,
}

/// Resolve all directives reachable from `root_doc`, pre-order.
///
/// `root_doc` must live under `tree_root`; resolved paths in the result are
/// relative to `tree_root`.
pub fn resolve_directives(root_doc: &Path, tree_root: &Path) -> Result<Vec<InputDirective>> {
    struct Frame {
        refs: std::vec::IntoIter<(DirectiveCommand, String)>,
        dir: PathBuf,
        depth: usize,
    }

    let root_rel = root_doc
        .strip_prefix(tree_root)
        .unwrap_or(root_doc)
        .to_path_buf();

    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(normalize(&root_rel));

    let mut out = Vec::new();
    // Explicit stack instead of call-stack recursion: the depth counter is
    // what bounds traversal, not the host stack.
    let mut stack = vec![Frame {
        refs: parse_document_refs(&read_text_file(root_doc)?).into_iter(),
        dir: root_rel.parent().unwrap_or(Path::new("")).to_path_buf(),
        depth: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some((command, argument)) = frame.refs.next() else {
            stack.pop();
            continue;
        };

        let target = with_tex_extension(&argument);

        // Resolve relative to the referencing document's directory first,
        // then retry against the tree root (root-relative convention).
        let local = normalize(&frame.dir.join(&target));
        let (resolved_rel, exists) = if tree_root.join(&local).is_file() {
            (local, true)
        } else {
            let rooted = normalize(Path::new(&target));
            if tree_root.join(&rooted).is_file() {
                (rooted, true)
            } else {
                (local, false)
            }
        };

        let next_depth = frame.depth + 1;
        let is_tex = resolved_rel
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tex"));

        out.push(InputDirective {
            command,
            argument,
            resolved_path: resolved_rel.clone(),
            exists,
        });

        if exists && is_tex && next_depth < MAX_INPUT_DEPTH && visited.insert(resolved_rel.clone())
        {
            let abs = tree_root.join(&resolved_rel);
            stack.push(Frame {
                refs: parse_document_refs(&read_text_file(&abs)?).into_iter(),
                dir: resolved_rel.parent().unwrap_or(Path::new("")).to_path_buf(),
                depth: next_depth,
            });
        }
    }

    Ok(out)
}

/// Extract directives from a document body, one per line, document order.
///
/// A line is skipped when an unescaped `%` precedes the directive token.
/// Multi-directive lines yield only the first directive on the line.
fn parse_document_refs(text: &str) -> Vec<(DirectiveCommand, String)> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(DirectiveCommand, String)> {
    let input_pos = line.find("\\input{");
    let include_pos = line.find("\\include{");

    let (pos, command, token_len) = match (input_pos, include_pos) {
        (Some(i), Some(c)) if i < c => (i, DirectiveCommand::Input, "\\input{".len()),
        (Some(i), None) => (i, DirectiveCommand::Input, "\\input{".len()),
        (_, Some(c)) => (c, DirectiveCommand::Include, "\\include{".len()),
        (None, None) => return None,
    };

    if comment_start(line).is_some_and(|c| c < pos) {
        return None;
    }

    let rest = &line[pos + token_len..];
    let end = rest.find('}')?;
    let argument = rest[..end].trim();
    if argument.is_empty() {
        return None;
    }
    Some((command, argument.to_string()))
}

/// Byte offset of the first unescaped `%`, if any.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    memchr_iter(b'%', bytes).find(|&i| i == 0 || bytes[i - 1] != b'\\')
}

/// Append `.tex` when the argument carries no extension.
fn with_tex_extension(argument: &str) -> String {
    let name = argument.rsplit('/').next().unwrap_or(argument);
    if name.contains('.') {
        argument.to_string()
    } else {
        format!("{argument}.tex")
    }
}

/// Normalize a path by resolving `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(name) => result.push(name),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    result
}
