use std::fmt;

use serde::{Deserialize, Serialize};

/// How a line participates in a structural diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the new document, or the new side of a modification.
    Added,
    /// Present only in the old document, or the old side of a modification.
    Removed,
    /// Context kept around a change.
    Unchanged,
}

impl ChangeKind {
    /// Two-character prefix used when rendering records as plain text.
    pub fn prefix(&self) -> &'static str {
        match self {
            ChangeKind::Added => "+ ",
            ChangeKind::Removed => "- ",
            ChangeKind::Unchanged => "  ",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One line of a structural diff.
///
/// `origin_line` is the 0-based index of the line in the document it came
/// from: the old document for `Removed`, the new document otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub line: String,
    pub origin_line: usize,
}

impl ChangeRecord {
    pub fn added(line: impl Into<String>, origin_line: usize) -> Self {
        Self {
            kind: ChangeKind::Added,
            line: line.into(),
            origin_line,
        }
    }

    pub fn removed(line: impl Into<String>, origin_line: usize) -> Self {
        Self {
            kind: ChangeKind::Removed,
            line: line.into(),
            origin_line,
        }
    }

    pub fn unchanged(line: impl Into<String>, origin_line: usize) -> Self {
        Self {
            kind: ChangeKind::Unchanged,
            line: line.into(),
            origin_line,
        }
    }

    /// Returns `true` for `Added` and `Removed` records.
    pub fn is_change(&self) -> bool {
        self.kind != ChangeKind::Unchanged
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.line)
    }
}
