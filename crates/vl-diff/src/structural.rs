//! Key-matched diff with context windows.
//!
//! Only keyed lines take part in matching. Each side is indexed by key (the
//! last occurrence of a repeated key wins), keys are compared across sides,
//! and the positions of added or modified lines in the new document define
//! the windows that are kept. Keyless lines are never matched; they only
//! appear as context inside a kept window.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vl_types::{extract_key, ChangeKind, ChangeRecord, Document};

/// Lines of context kept on each side of a change.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// The result of diffing two documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDiff {
    /// Records in output order: kept new-document lines first, then lines
    /// whose key disappeared from the new document.
    pub records: Vec<ChangeRecord>,
    /// Total number of lines in the old document.
    pub old_lines: usize,
    /// Total number of lines in the new document.
    pub new_lines: usize,
}

impl StructuralDiff {
    /// Returns `true` if no records were produced.
    ///
    /// Records only exist around an addition or a removal, so this is the
    /// same as `!self.has_changes()`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records, context included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if any record is an addition or a removal.
    pub fn has_changes(&self) -> bool {
        self.records.iter().any(ChangeRecord::is_change)
    }

    /// Number of `Added` records.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    /// Number of `Removed` records.
    pub fn deletions(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.records.iter()
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a StructuralDiff {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A keyed line and where it sits in its document.
#[derive(Clone, Copy, Debug)]
struct KeyedLine<'a> {
    line: &'a str,
    index: usize,
}

fn index_keys(document: &Document) -> HashMap<&str, KeyedLine<'_>> {
    document
        .keyed_lines()
        .map(|(index, key, line)| (key, KeyedLine { line, index }))
        .collect()
}

/// Diff two texts with [`DEFAULT_CONTEXT_LINES`] of context.
pub fn diff_documents(old: &str, new: &str) -> StructuralDiff {
    diff_documents_with_context(old, new, DEFAULT_CONTEXT_LINES)
}

/// Diff two texts, keeping `context` lines on each side of every change.
///
/// A new-document line is kept when an added or modified line lies within
/// `context` raw line positions of it. Modified lines are emitted as the old
/// line (`Removed`) immediately followed by the new one (`Added`). Keys that
/// exist only in the old document are appended at the end, in old-document
/// order, regardless of where they sat.
pub fn diff_documents_with_context(old: &str, new: &str, context: usize) -> StructuralDiff {
    let old_doc = Document::parse(old);
    let new_doc = Document::parse(new);
    let old_keys = index_keys(&old_doc);
    let new_keys = index_keys(&new_doc);

    let mut changed = vec![false; new_doc.len()];
    for (key, new_line) in &new_keys {
        let unchanged = old_keys
            .get(key)
            .is_some_and(|old_line| old_line.line == new_line.line);
        if !unchanged {
            changed[new_line.index] = true;
        }
    }
    let kept = context_window(&changed, context);

    let mut records = Vec::new();
    for (index, line) in new_doc.lines().iter().enumerate() {
        if !kept[index] {
            continue;
        }

        let Some(key) = extract_key(line) else {
            records.push(ChangeRecord::unchanged(line.as_str(), index));
            continue;
        };

        match old_keys.get(key) {
            Some(old_line) if old_line.line != line.as_str() => {
                records.push(ChangeRecord::removed(old_line.line, old_line.index));
                records.push(ChangeRecord::added(line.as_str(), index));
            }
            Some(_) => records.push(ChangeRecord::unchanged(line.as_str(), index)),
            None => records.push(ChangeRecord::added(line.as_str(), index)),
        }
    }

    let mut dropped: Vec<KeyedLine<'_>> = old_keys
        .iter()
        .filter(|(key, _)| !new_keys.contains_key(*key))
        .map(|(_, old_line)| *old_line)
        .collect();
    dropped.sort_by_key(|old_line| old_line.index);
    records.extend(
        dropped
            .into_iter()
            .map(|old_line| ChangeRecord::removed(old_line.line, old_line.index)),
    );

    let diff = StructuralDiff {
        records,
        old_lines: old_doc.len(),
        new_lines: new_doc.len(),
    };
    debug!(
        additions = diff.additions(),
        deletions = diff.deletions(),
        records = diff.len(),
        "structural diff computed"
    );
    diff
}

/// Mark every position within `context` of a changed position.
fn context_window(changed: &[bool], context: usize) -> Vec<bool> {
    let mut kept = vec![false; changed.len()];
    for (index, _) in changed.iter().enumerate().filter(|(_, is_changed)| **is_changed) {
        let start = index.saturating_sub(context);
        let end = index.saturating_add(context).min(changed.len() - 1);
        kept[start..=end].iter_mut().for_each(|k| *k = true);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(diff: &StructuralDiff) -> Vec<(ChangeKind, &str)> {
        diff.iter().map(|r| (r.kind, r.line.as_str())).collect()
    }

    #[test]
    fn identical_documents_no_diff() {
        let text = "app:\n  name: web\n  replicas: 3\n";
        let diff = diff_documents(text, text);
        assert!(diff.is_empty());
        assert!(!diff.has_changes());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn modification_shows_remove_then_add() {
        let diff = diff_documents("a: 1\nb: 2\n", "a: 1\nb: 3\n");
        let records = kinds(&diff);
        let removed = records
            .iter()
            .position(|r| *r == (ChangeKind::Removed, "b: 2"))
            .expect("removed record");
        assert_eq!(records[removed + 1], (ChangeKind::Added, "b: 3"));
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn modification_keeps_both_origins() {
        let diff = diff_documents("x: 0\nb: 2\n", "b: 3\n");
        let removed = diff
            .iter()
            .find(|r| r.kind == ChangeKind::Removed && r.line == "b: 2")
            .unwrap();
        let added = diff.iter().find(|r| r.kind == ChangeKind::Added).unwrap();
        assert_eq!(removed.origin_line, 1);
        assert_eq!(added.origin_line, 0);
    }

    #[test]
    fn single_addition() {
        let diff = diff_documents("a: 1\n", "a: 1\nc: 2\n");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        let added: Vec<_> = diff.iter().filter(|r| r.kind == ChangeKind::Added).collect();
        assert_eq!(added[0].line, "c: 2");
        assert_eq!(added[0].origin_line, 1);
    }

    #[test]
    fn context_window_is_two_lines() {
        let old = "a: 1\nb: 1\nc: 1\nd: 1\ne: 1\nf: 1\ng: 1\nh: 1\ni: 1\nj: 1";
        let new = "a: 1\nb: 1\nc: 1\nd: 1\ne: 2\nf: 1\ng: 1\nh: 1\ni: 1\nj: 1";
        let diff = diff_documents(old, new);
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Unchanged, "c: 1"),
                (ChangeKind::Unchanged, "d: 1"),
                (ChangeKind::Removed, "e: 1"),
                (ChangeKind::Added, "e: 2"),
                (ChangeKind::Unchanged, "f: 1"),
                (ChangeKind::Unchanged, "g: 1"),
            ]
        );
    }

    #[test]
    fn distant_changes_produce_separate_neighborhoods() {
        let old: String = (0..20).map(|i| format!("k{i}: 0\n")).collect();
        let new = old.replace("k1: 0", "k1: 1").replace("k18: 0", "k18: 1");
        let diff = diff_documents(&old, &new);
        let kept: Vec<usize> = diff
            .iter()
            .filter(|r| r.kind != ChangeKind::Removed)
            .map(|r| r.origin_line)
            .collect();
        // k1 window [0, 3], k18 window [16, 20] (20 is the trailing blank line).
        assert_eq!(kept, vec![0, 1, 2, 3, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn keyless_lines_appear_only_as_context() {
        let old = "list:\n  - a\n  - b\nname: x\n";
        let new = "list:\n  - a\n  - c\nname: y\n";
        let diff = diff_documents(old, new);
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Unchanged, "  - a"),
                (ChangeKind::Unchanged, "  - c"),
                (ChangeKind::Removed, "name: x"),
                (ChangeKind::Added, "name: y"),
                (ChangeKind::Unchanged, ""),
            ]
        );
    }

    #[test]
    fn keyless_only_changes_are_invisible() {
        let diff = diff_documents("list:\n  - a\n", "list:\n  - b\n");
        assert!(diff.is_empty());
    }

    #[test]
    fn removed_keys_appended_in_old_order() {
        let old = "z: 1\na: 1\nkeep: 1\nm: 1\n";
        let new = "keep: 1\n";
        let diff = diff_documents(old, new);
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Removed, "z: 1"),
                (ChangeKind::Removed, "a: 1"),
                (ChangeKind::Removed, "m: 1"),
            ]
        );
        assert_eq!(
            diff.iter().map(|r| r.origin_line).collect::<Vec<_>>(),
            vec![0, 1, 3]
        );
    }

    #[test]
    fn removed_keys_follow_the_main_pass() {
        let diff = diff_documents("gone: 1\na: 1\nb: 2\n", "a: 1\nb: 3\n");
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Unchanged, "a: 1"),
                (ChangeKind::Removed, "b: 2"),
                (ChangeKind::Added, "b: 3"),
                (ChangeKind::Unchanged, ""),
                (ChangeKind::Removed, "gone: 1"),
            ]
        );
        let last = diff.records.last().unwrap();
        assert_eq!(last.origin_line, 0);
        assert_eq!(diff.records[1].origin_line, 2);
    }

    #[test]
    fn keys_without_space_after_colon_are_matched() {
        let diff = diff_documents("k:1\nurl:http://a\n", "k:2\nurl:http://a\n");
        assert_eq!(
            kinds(&diff),
            vec![
                (ChangeKind::Removed, "k:1"),
                (ChangeKind::Added, "k:2"),
                (ChangeKind::Unchanged, "url:http://a"),
                (ChangeKind::Unchanged, ""),
            ]
        );
    }

    #[test]
    fn removals_do_not_open_context_windows() {
        let diff = diff_documents("a: 1\nb: 1\n", "a: 1\n");
        assert_eq!(kinds(&diff), vec![(ChangeKind::Removed, "b: 1")]);
    }

    #[test]
    fn repeated_key_matches_coarsely() {
        // `name` occurs under two parents; the last occurrence represents it.
        let old = "web:\n  name: a\ndb:\n  name: b\n";
        let new = "web:\n  name: a\ndb:\n  name: c\n";
        let diff = diff_documents(old, new);
        assert!(diff
            .iter()
            .any(|r| r.kind == ChangeKind::Added && r.line == "  name: c"));
        // The untouched `web.name` line sits in the window and is compared
        // against the last old `name` line, so it shows as modified too.
        assert!(diff
            .iter()
            .any(|r| r.kind == ChangeKind::Added && r.line == "  name: a"));
    }

    #[test]
    fn empty_inputs() {
        assert!(diff_documents("", "").is_empty());
        let diff = diff_documents("", "a: 1");
        assert_eq!(kinds(&diff), vec![(ChangeKind::Added, "a: 1")]);
        let diff = diff_documents("a: 1", "");
        assert_eq!(kinds(&diff), vec![(ChangeKind::Removed, "a: 1")]);
    }

    #[test]
    fn zero_context_keeps_only_changes() {
        let diff = diff_documents_with_context("a: 1\nb: 1\nc: 1", "a: 1\nb: 2\nc: 1", 0);
        assert_eq!(
            kinds(&diff),
            vec![(ChangeKind::Removed, "b: 1"), (ChangeKind::Added, "b: 2")]
        );
    }

    #[test]
    fn line_counts_recorded() {
        let diff = diff_documents("a: 1\nb: 2\n", "a: 1\n");
        assert_eq!(diff.old_lines, 3);
        assert_eq!(diff.new_lines, 2);
    }

    #[test]
    fn serializes_records() {
        let diff = diff_documents("a: 1", "a: 2");
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["records"][0]["kind"], "removed");
        assert_eq!(json["records"][1]["kind"], "added");
    }

    #[test]
    fn window_helper_clips_edges() {
        let kept = context_window(&[true, false, false, false, true], 1);
        assert_eq!(kept, vec![true, true, false, true, true]);
        assert!(context_window(&[], 2).is_empty());
    }

    fn document_strategy() -> impl Strategy<Value = String> {
        let line = prop_oneof![
            "[a-z]{1,4}: [a-z0-9]{0,4}",
            "  [a-z]{1,4}: [a-z0-9]{0,4}",
            "  - [a-z]{1,4}",
            "# [a-z ]{0,8}",
            Just(String::new()),
        ];
        prop::collection::vec(line, 0..30).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn identical_text_has_no_changes(text in document_strategy()) {
            let diff = diff_documents(&text, &text);
            prop_assert_eq!(diff.additions(), 0);
            prop_assert_eq!(diff.deletions(), 0);
            prop_assert!(diff.iter().all(|r| r.kind == ChangeKind::Unchanged));
        }

        #[test]
        fn empty_means_no_changes(
            old in document_strategy(),
            new in document_strategy(),
        ) {
            let diff = diff_documents(&old, &new);
            prop_assert_eq!(diff.is_empty(), !diff.has_changes());
        }

        #[test]
        fn removed_is_always_followed_by_added_in_main_pass(
            old in document_strategy(),
            new in document_strategy(),
        ) {
            let diff = diff_documents(&old, &new);
            let new_keys: std::collections::HashSet<&str> =
                new.split('\n').filter_map(extract_key).collect();
            for pair in diff.records.windows(2) {
                if pair[0].kind == ChangeKind::Removed
                    && extract_key(&pair[0].line).is_some_and(|k| new_keys.contains(k))
                {
                    prop_assert_eq!(pair[1].kind, ChangeKind::Added);
                }
            }
        }
    }
}
