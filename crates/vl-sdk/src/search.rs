use serde::{Deserialize, Serialize};
use vl_path::{locate, Location};

/// A line matching a search query, with where it lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 0-based index of the matching line.
    pub line_index: usize,
    pub location: Location,
}

/// Case-insensitive substring search over `lines`.
///
/// Every matching line is reported, in order, together with its structural
/// path (or a line-number fallback). An empty query matches nothing.
pub fn search_lines<S: AsRef<str>>(lines: &[S], query: &str) -> Vec<SearchMatch> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let line: &str = line.as_ref();
            line.to_lowercase().contains(&needle)
        })
        .filter_map(|(line_index, _)| {
            locate(lines, line_index).map(|location| SearchMatch {
                line_index,
                location,
            })
        })
        .collect()
}
