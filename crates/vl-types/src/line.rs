//! Per-line classification of YAML-like text.
//!
//! Each line is looked at in isolation. The classifier is a small scanner,
//! not a YAML parser: it only answers whether a line is blank, a comment, a
//! list item, a `key: value` line, or something else, and it measures the
//! line's indentation.

/// Indent units contributed by a single space.
const SPACE_WIDTH: usize = 1;
/// Indent units contributed by a single tab.
const TAB_WIDTH: usize = 2;

/// The structural class of one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Trimmed content starts with `#`.
    Comment,
    /// Trimmed content starts with `-`.
    ListItem,
    /// `<indent><key>:<value>` (the value may be empty).
    Keyed { key: &'a str },
    /// Continuation or scalar text with no key of its own.
    Other,
}

impl<'a> LineKind<'a> {
    /// The extracted key, if this is a keyed line.
    pub fn key(&self) -> Option<&'a str> {
        match self {
            LineKind::Keyed { key } => Some(*key),
            _ => None,
        }
    }

    /// Blank and comment lines carry no structure at all and are skipped by
    /// backward scans.
    pub fn is_structural(&self) -> bool {
        !matches!(self, LineKind::Blank | LineKind::Comment)
    }
}

/// Classify a single line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    match trimmed.chars().next() {
        None => LineKind::Blank,
        Some('#') => LineKind::Comment,
        Some('-') => LineKind::ListItem,
        Some(_) => match scan_key(trimmed) {
            Some(key) => LineKind::Keyed { key },
            None => LineKind::Other,
        },
    }
}

/// Find the key of a trimmed, non-empty line: the text before its first `:`.
///
/// A line that starts with `:` has no key.
fn scan_key(trimmed: &str) -> Option<&str> {
    let colon_at = trimmed.find(':')?;
    if colon_at == 0 {
        return None;
    }
    let key = trimmed[..colon_at].trim();
    (!key.is_empty()).then_some(key)
}

/// The key of a `key: value` line, or `None` for every other kind of line.
pub fn extract_key(line: &str) -> Option<&str> {
    match classify_line(line) {
        LineKind::Keyed { key } => Some(key),
        _ => None,
    }
}

/// Leading indentation in units: one per space, two per tab.
pub fn indent_level(line: &str) -> usize {
    line.chars()
        .map_while(|ch| match ch {
            ' ' => Some(SPACE_WIDTH),
            '\t' => Some(TAB_WIDTH),
            _ => None,
        })
        .sum()
}
