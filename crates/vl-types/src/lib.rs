//! Foundation types for valuelens.
//!
//! Every other valuelens crate depends on `vl-types`. It owns the pieces that
//! the path resolver and the structural differ must agree on: how a raw text
//! blob becomes lines, and how a single line is classified.
//!
//! # Key Types
//!
//! - [`Document`] — Ordered, 0-indexed lines of a text blob
//! - [`LineKind`] — Per-line classification (blank, comment, list item, keyed, other)
//! - [`ChangeKind`] / [`ChangeRecord`] — One line of a structural diff

pub mod change;
pub mod document;
pub mod error;
pub mod line;

pub use change::{ChangeKind, ChangeRecord};
pub use document::Document;
pub use error::{TypesError, TypesResult};
pub use line::{classify_line, extract_key, indent_level, LineKind};
