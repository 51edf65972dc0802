use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::{resolve, Resolution};

/// Longest line excerpt shown when a line has no structural path.
pub const EXCERPT_LIMIT: usize = 60;

/// A human-facing description of where a line lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// The line resolved to a structural path.
    Path { path: String },
    /// No path; identify the line by its 1-based number and content.
    Line { number: usize, excerpt: String },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path { path } => f.write_str(path),
            Location::Line { number, excerpt } => write!(f, "Line {number}: {excerpt}"),
        }
    }
}

/// Describe `lines[index]`: its path when one resolves, otherwise its line
/// number and trimmed content. `None` when `index` is out of range.
pub fn locate<S: AsRef<str>>(lines: &[S], index: usize) -> Option<Location> {
    let line: &str = lines.get(index)?.as_ref();
    let location = match resolve(lines, index) {
        Resolution::Resolved(path) => Location::Path { path },
        Resolution::Unresolved => Location::Line {
            number: index + 1,
            excerpt: excerpt(line),
        },
    };
    Some(location)
}

fn excerpt(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}
