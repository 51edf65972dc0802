use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("line number {number} is out of range (document has {len} lines)")]
    LineOutOfRange { number: usize, len: usize },
}

/// Result alias for type operations.
pub type TypesResult<T> = Result<T, TypesError>;
