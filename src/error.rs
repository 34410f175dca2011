//! Error type shared by every public operation of the crate.

use thiserror::Error;

/// Coarse classification the presentation layer switches on to decide how to
/// phrase a failure (validation hint vs. "not found" vs. storage problem).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    MalformedInput,
    Unauthorized,
    Persistence,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Student {0} not found.")]
    StudentNotFound(String),

    #[error("Student with ID {0} already exists.")]
    DuplicateStudent(String),

    #[error("Username {0} is already taken.")]
    DuplicateUsername(String),

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Year must be a valid number (got {0:?}).")]
    MalformedYear(String),

    #[error("Year must be between 1 and 10 (got {0}).")]
    YearOutOfRange(u32),

    /// The snapshot could not be written. The in-memory collection was left
    /// as it was before the call.
    #[error("failed to save {collection}: {source:#}")]
    Persistence {
        collection: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::StudentNotFound(_) => ErrorKind::NotFound,
            StoreError::DuplicateStudent(_) | StoreError::DuplicateUsername(_) => {
                ErrorKind::Conflict
            }
            StoreError::InvalidCredentials => ErrorKind::Unauthorized,
            StoreError::MissingField(_)
            | StoreError::MalformedYear(_)
            | StoreError::YearOutOfRange(_) => ErrorKind::MalformedInput,
            StoreError::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    pub(crate) fn persistence(collection: &'static str, source: anyhow::Error) -> Self {
        StoreError::Persistence { collection, source }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
