use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vl_cache::{Clock, ExpiringStore, SystemClock};
use vl_diff::{diff_documents_with_context, StructuralDiff};
use vl_types::Document;

use crate::config::LensConfig;
use crate::error::{SdkError, SdkResult};
use crate::search::{search_lines, SearchMatch};
use crate::source::ValuesSource;

/// The result of comparing two versions of the same document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub name: String,
    pub old_version: String,
    pub new_version: String,
    pub diff: StructuralDiff,
}

/// Cached access to documents from a [`ValuesSource`].
///
/// Documents, version lists and per-repo chart lists are each kept in an
/// [`ExpiringStore`]. The
/// lens is `Sync` when its source is, so one instance can serve a UI loop and
/// background fetches at the same time.
pub struct ValuesLens<S> {
    source: S,
    values: ExpiringStore<String>,
    versions: ExpiringStore<Vec<String>>,
    charts: ExpiringStore<Vec<String>>,
    context_lines: usize,
}

impl<S: ValuesSource> ValuesLens<S> {
    /// A lens with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &LensConfig::default())
    }

    pub fn with_config(source: S, config: &LensConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// A lens whose caches read time from `clock`.
    pub fn with_clock(source: S, config: &LensConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            values: ExpiringStore::with_clock(config.cache_ttl(), Arc::clone(&clock)),
            versions: ExpiringStore::with_clock(config.cache_ttl(), Arc::clone(&clock)),
            charts: ExpiringStore::with_clock(config.cache_ttl(), clock),
            context_lines: config.context_lines,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The document for `name` at `version`, from cache when fresh.
    ///
    /// Fetch failures are returned and never cached.
    pub fn values(&self, name: &str, version: &str) -> SdkResult<String> {
        if let Some(text) = self.values.get(name, version) {
            return Ok(text);
        }

        debug!(name, version, "fetching values");
        let text = self.source.fetch_values(name, version).map_err(|e| {
            warn!(name, version, error = %e, "values fetch failed");
            e
        })?;
        self.values.set(name, version, text.clone());
        Ok(text)
    }

    /// Known versions of `name`, from cache when fresh.
    ///
    /// An empty list is returned but not cached, so the next call asks the
    /// source again.
    pub fn versions(&self, name: &str) -> SdkResult<Vec<String>> {
        if let Some(versions) = self.versions.get(name, "") {
            return Ok(versions);
        }

        debug!(name, "fetching versions");
        let versions = self.source.fetch_versions(name).map_err(|e| {
            warn!(name, error = %e, "versions fetch failed");
            e
        })?;
        if !versions.is_empty() {
            self.versions.set(name, "", versions.clone());
        }
        Ok(versions)
    }

    /// Chart names published by `repo`, from cache when fresh.
    ///
    /// Like [`versions`](Self::versions), an empty list is not cached.
    pub fn charts(&self, repo: &str) -> SdkResult<Vec<String>> {
        if let Some(charts) = self.charts.get(repo, "") {
            return Ok(charts);
        }

        debug!(repo, "fetching charts");
        let charts = self.source.fetch_charts(repo).map_err(|e| {
            warn!(repo, error = %e, "charts fetch failed");
            e
        })?;
        if !charts.is_empty() {
            self.charts.set(repo, "", charts.clone());
        }
        Ok(charts)
    }

    /// Diff two versions of `name`, loading each through the cache.
    pub fn compare(&self, name: &str, old_version: &str, new_version: &str) -> SdkResult<Comparison> {
        if old_version == new_version {
            return Err(SdkError::SameVersion(old_version.to_owned()));
        }

        let old_text = self.values(name, old_version)?;
        let new_text = self.values(name, new_version)?;
        let diff = diff_documents_with_context(&old_text, &new_text, self.context_lines);

        Ok(Comparison {
            name: name.to_owned(),
            old_version: old_version.to_owned(),
            new_version: new_version.to_owned(),
            diff,
        })
    }

    /// Structural path of `lines[index]` in `text`, or `""`.
    pub fn path_at(&self, text: &str, index: usize) -> String {
        vl_path::resolve_path(Document::parse(text).lines(), index)
    }

    /// Structural path of a 1-based line number in `text`.
    pub fn path_at_line_number(&self, text: &str, number: usize) -> SdkResult<String> {
        let document = Document::parse(text);
        let index = document.index_of_line_number(number)?;
        Ok(vl_path::resolve_path(document.lines(), index))
    }

    /// Case-insensitive search over the lines of `text`.
    pub fn search(&self, text: &str, query: &str) -> Vec<SearchMatch> {
        search_lines(Document::parse(text).lines(), query)
    }

    /// Drop every cached document, version list and chart list.
    pub fn invalidate(&self) {
        self.values.clear();
        self.versions.clear();
        self.charts.clear();
    }
}

impl<S> std::fmt::Debug for ValuesLens<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuesLens")
            .field("values", &self.values)
            .field("versions", &self.versions)
            .field("charts", &self.charts)
            .field("context_lines", &self.context_lines)
            .finish_non_exhaustive()
    }
}
