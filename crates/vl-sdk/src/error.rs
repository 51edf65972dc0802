use thiserror::Error;

/// Failures reported by a [`ValuesSource`](crate::ValuesSource).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no document for {name} (version {version:?})")]
    NotFound { name: String, version: String },

    #[error("fetch failed for {name}: {reason}")]
    Fetch { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("cannot compare version {0} with itself")]
    SameVersion(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Types(#[from] vl_types::TypesError),
}

pub type SdkResult<T> = Result<T, SdkError>;
