use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use vl_cache::build_key;

use crate::error::{SourceError, SourceResult};

/// Where raw documents come from.
///
/// Implementations talk to the outside world (a package-manager CLI, an
/// HTTP index, the filesystem). They are the only fallible boundary of the
/// SDK; everything downstream of a fetched blob is total.
pub trait ValuesSource: Send + Sync {
    /// Fetch the document for `name` at `version`. An empty version means the
    /// default/latest one.
    fn fetch_values(&self, name: &str, version: &str) -> SourceResult<String>;

    /// Fetch the known versions of `name`, newest first.
    fn fetch_versions(&self, name: &str) -> SourceResult<Vec<String>>;

    /// Fetch the names of the documents published by `repo`.
    fn fetch_charts(&self, repo: &str) -> SourceResult<Vec<String>>;
}

/// `HashMap`-backed source for tests and embedding.
///
/// Counts every fetch so callers can observe whether a cache in front of it
/// was consulted.
#[derive(Debug, Default)]
pub struct InMemorySource {
    values: RwLock<HashMap<String, String>>,
    versions: RwLock<HashMap<String, Vec<String>>>,
    charts: RwLock<HashMap<String, Vec<String>>>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_values(&self, name: &str, version: &str, text: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(build_key(name, version), text.into());
    }

    pub fn insert_versions<I, V>(&self, name: &str, versions: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.versions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), versions.into_iter().map(Into::into).collect());
    }

    pub fn insert_charts<I, C>(&self, repo: &str, charts: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.charts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(repo.to_owned(), charts.into_iter().map(Into::into).collect());
    }

    /// Total number of `fetch_*` calls served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ValuesSource for InMemorySource {
    fn fetch_values(&self, name: &str, version: &str) -> SourceResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&build_key(name, version))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_owned(),
                version: version.to_owned(),
            })
    }

    fn fetch_versions(&self, name: &str) -> SourceResult<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .versions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_charts(&self, repo: &str) -> SourceResult<Vec<String>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .charts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(repo)
            .cloned()
            .unwrap_or_default())
    }
}
