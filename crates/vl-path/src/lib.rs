//! Structural path resolution for YAML-like text.
//!
//! Answers "which field does this line belong to" as a dot-joined path such
//! as `app.resources.limits`, inferred from indentation alone.
//!
//! # Key Types
//!
//! - [`resolve_path`] / [`resolve`] -- Path of a line in a slice of lines
//! - [`Resolution`] -- Resolved path or "no path available"
//! - [`Location`] / [`locate`] -- Path, or a line-number fallback for display
//!
//! The resolver is a heuristic over indentation, not a parser. It never
//! fails: input it cannot make sense of resolves to an empty path.

pub mod location;
pub mod resolver;

pub use location::{locate, Location, EXCERPT_LIMIT};
pub use resolver::{resolve, resolve_path, PathResolver, Resolution, PATH_SEPARATOR};
