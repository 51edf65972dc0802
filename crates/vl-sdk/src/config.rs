use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SdkResult;

/// Tunables for a [`ValuesLens`](crate::ValuesLens).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// How long fetched documents and version lists stay fresh, in seconds.
    pub cache_ttl_secs: u64,
    /// Lines of context kept on each side of a diff change.
    pub context_lines: usize,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: vl_cache::DEFAULT_TTL.as_secs(),
            context_lines: vl_diff::DEFAULT_CONTEXT_LINES,
        }
    }
}

impl LensConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
