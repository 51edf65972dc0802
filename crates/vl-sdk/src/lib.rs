//! High-level valuelens API.
//!
//! Ties the cache, the path resolver and the structural differ together the
//! way an interactive front end uses them: documents are fetched through a
//! [`ValuesSource`], kept in an expiring cache, and compared or searched on
//! demand.
//!
//! ```
//! use vl_sdk::{InMemorySource, ValuesLens};
//!
//! let source = InMemorySource::new();
//! source.insert_values("nginx", "1.0.0", "replicas: 1\n");
//! source.insert_values("nginx", "1.1.0", "replicas: 2\n");
//!
//! let lens = ValuesLens::new(source);
//! let comparison = lens.compare("nginx", "1.0.0", "1.1.0").unwrap();
//! assert_eq!(comparison.diff.additions(), 1);
//! ```

pub mod config;
pub mod error;
pub mod lens;
pub mod search;
pub mod source;

pub use config::LensConfig;
pub use error::{SdkError, SdkResult, SourceError, SourceResult};
pub use lens::{Comparison, ValuesLens};
pub use search::{search_lines, SearchMatch};
pub use source::{InMemorySource, ValuesSource};
