//! Time-bound cache for fetched configuration documents.
//!
//! Fetching a document (chart values, version lists) from its source is slow
//! compared to reading it back from memory, and within a short window the
//! source does not change. [`ExpiringStore`] keeps each payload for a fixed
//! TTL and hands it back on request until that window has passed.
//!
//! # Design Rules
//!
//! 1. Keys are `name` or `name@version` (see [`build_key`]); equality is exact.
//! 2. Expiry is lazy: stale entries are ignored on read and stay in the map
//!    until overwritten, purged, or cleared.
//! 3. Reads share the lock, writes take it exclusively; no I/O happens while
//!    it is held.
//! 4. Nothing fails. A miss is an ordinary outcome.
//! 5. Time comes from an injected [`Clock`] so expiry can be driven in tests.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{build_key, ExpiringStore, DEFAULT_TTL};
