//! Backward-scanning path resolver.
//!
//! The resolver works in two passes over the lines above the target:
//!
//! 1. **Anchor.** A keyed target anchors itself. A keyless target (list item,
//!    continuation, scalar block) borrows the key of the nearest plausible
//!    parent: for list items, the closest keyed line exactly one nesting
//!    level (two indent units) shallower; for anything else, the closest keyed
//!    line at the same or a shallower indent.
//! 2. **Ancestors.** From the anchor upward, every keyed line that is
//!    strictly shallower than the last one collected becomes the next
//!    ancestor, until a line at indent 0 has been seen.
//!
//! Blank and comment lines are invisible to both passes.

use serde::{Deserialize, Serialize};
use vl_types::{classify_line, indent_level, Document, LineKind};

/// Separator between path segments. Keys containing it are not escaped.
pub const PATH_SEPARATOR: &str = ".";

/// Indent distance between a list item and the key that owns the list.
const LIST_NESTING: usize = 2;

/// Outcome of resolving one line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum Resolution {
    /// The dot-joined path from the document root to the line's field.
    Resolved(String),
    /// No path exists for the line (blank, comment, out of range, orphan).
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The path, if one was found.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(path) => Some(path),
            Resolution::Unresolved => None,
        }
    }

    /// The path, or an empty string when unresolved.
    pub fn into_path(self) -> String {
        match self {
            Resolution::Resolved(path) => path,
            Resolution::Unresolved => String::new(),
        }
    }
}

/// Resolve the structural path of `lines[index]`.
pub fn resolve<S: AsRef<str>>(lines: &[S], index: usize) -> Resolution {
    let Some(target) = lines.get(index) else {
        return Resolution::Unresolved;
    };
    let target: &str = target.as_ref();

    let kind = classify_line(target);
    if !kind.is_structural() {
        return Resolution::Unresolved;
    }

    let (anchor, key) = match kind.key() {
        Some(key) => (index, key),
        None => match find_parent(lines, index, kind) {
            Some(parent) => parent,
            None => return Resolution::Unresolved,
        },
    };

    let mut segments = ancestors(lines, anchor);
    segments.push(key);
    Resolution::Resolved(segments.join(PATH_SEPARATOR))
}

/// Resolve the structural path of `lines[index]`, or `""` when there is none.
pub fn resolve_path<S: AsRef<str>>(lines: &[S], index: usize) -> String {
    resolve(lines, index).into_path()
}

/// Nearest keyed line above a keyless target that can stand in for it.
fn find_parent<'a, S: AsRef<str>>(
    lines: &'a [S],
    index: usize,
    kind: LineKind<'_>,
) -> Option<(usize, &'a str)> {
    let indent = indent_level(lines[index].as_ref());
    let list_parent_indent = indent.saturating_sub(LIST_NESTING);
    let is_list_item = kind == LineKind::ListItem;

    lines[..index]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(idx, line)| {
            let line: &str = line.as_ref();
            let key = classify_line(line).key()?;
            let candidate = indent_level(line);
            let fits = if is_list_item {
                candidate == list_parent_indent
            } else {
                candidate <= indent
            };
            fits.then_some((idx, key))
        })
}

/// Keys of the enclosing fields of `lines[anchor]`, outermost first.
fn ancestors<S: AsRef<str>>(lines: &[S], anchor: usize) -> Vec<&str> {
    let mut current = indent_level(lines[anchor].as_ref());
    let mut keys = Vec::new();
    if current == 0 {
        return keys;
    }

    for line in lines[..anchor].iter().rev() {
        let line: &str = line.as_ref();
        let kind = classify_line(line);
        if !kind.is_structural() {
            continue;
        }

        let indent = indent_level(line);
        if indent < current {
            if let Some(key) = kind.key() {
                keys.push(key);
                current = indent;
            }
        }
        if indent == 0 {
            break;
        }
    }

    keys.reverse();
    keys
}

/// Path resolution over a borrowed [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct PathResolver<'a> {
    lines: &'a [String],
}

impl<'a> PathResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            lines: document.lines(),
        }
    }

    pub fn resolve(&self, index: usize) -> Resolution {
        resolve(self.lines, index)
    }

    /// The path of `index`, or `""` when there is none.
    pub fn path_at(&self, index: usize) -> String {
        resolve_path(self.lines, index)
    }

    /// `(index, path)` for every keyed line, in document order.
    pub fn keyed_paths(&self) -> impl Iterator<Item = (usize, String)> + 'a {
        let lines = self.lines;
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| classify_line(line).key().is_some())
            .map(move |(idx, _)| (idx, resolve_path(lines, idx)))
    }
}
