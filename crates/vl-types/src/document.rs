use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};
use crate::line::{classify_line, LineKind};

/// An ordered, 0-indexed sequence of text lines.
///
/// Documents are cheap views recomputed from a raw blob whenever line
/// structure is needed. Splitting happens on `\n` only, so a blob ending in a
/// newline produces a trailing empty line; that line is blank and carries no
/// structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split a raw text blob into lines.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Wrap an already-split sequence of lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// All lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at a 0-based index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Classification of the line at `index`.
    pub fn kind(&self, index: usize) -> Option<LineKind<'_>> {
        self.line(index).map(classify_line)
    }

    /// Every keyed line as `(index, key, line)`, in document order.
    pub fn keyed_lines(&self) -> impl Iterator<Item = (usize, &str, &str)> + '_ {
        self.lines.iter().enumerate().filter_map(|(idx, line)| {
            classify_line(line).key().map(|key| (idx, key, line.as_str()))
        })
    }

    /// Convert a 1-based line number (as shown to users) to a 0-based index.
    pub fn index_of_line_number(&self, number: usize) -> TypesResult<usize> {
        if number == 0 || number > self.lines.len() {
            return Err(TypesError::LineOutOfRange {
                number,
                len: self.lines.len(),
            });
        }
        Ok(number - 1)
    }
}
