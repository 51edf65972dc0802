//! Structural diff engine for valuelens.
//!
//! Compares two versions of a YAML-like document by matching `key: value`
//! lines on their key, and reports only the changed neighborhoods: each
//! change plus a fixed number of surrounding lines. Large documents where
//! most lines are identical collapse to a handful of records.
//!
//! # Key Types
//!
//! - [`StructuralDiff`] -- Ordered change records plus summary counts
//! - [`diff_documents`] / [`diff_documents_with_context`] -- Entry points
//!
//! Matching is by bare key text, not full path: two fields with the same
//! name at different depths are treated as the same key.

pub mod structural;

pub use structural::{
    diff_documents, diff_documents_with_context, StructuralDiff, DEFAULT_CONTEXT_LINES,
};
pub use vl_types::{ChangeKind, ChangeRecord};
