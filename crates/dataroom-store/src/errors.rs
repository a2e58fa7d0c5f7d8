//! Error handling for dataroom-store

use dataroom_core::errors::{ExError, ExErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O failure during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("State serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Archive could not be read: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive has {count} entries, more than the limit of {limit}")]
    TooManyEntries { count: usize, limit: usize },

    #[error("Archive expands past the limit of {limit} bytes")]
    ArchiveTooLarge { limit: u64 },

    #[error("File id {file_id:?} cannot be used as a blob name")]
    InvalidBlobId { file_id: String },
}

impl StoreError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            StoreError::Io { .. } => ExErrorKind::Io,
            StoreError::Serialization(_) => ExErrorKind::Serialization,
            StoreError::Archive(_) | StoreError::InvalidBlobId { .. } => ExErrorKind::InvalidInput,
            StoreError::TooManyEntries { .. } | StoreError::ArchiveTooLarge { .. } => {
                ExErrorKind::ConstraintViolation
            }
        }
    }
}

/// Wrap an I/O error with the operation that hit it
pub fn io_error(op: &'static str, source: std::io::Error) -> StoreError {
    StoreError::Io { op, source }
}

impl From<&StoreError> for ExError {
    fn from(err: &StoreError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            StoreError::Io { op, .. } => ex.with_op(*op),
            StoreError::InvalidBlobId { file_id } => ex.with_entity_id(file_id.clone()),
            _ => ex,
        }
    }
}

impl From<StoreError> for ExError {
    fn from(err: StoreError) -> Self {
        ExError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_op() {
        let err = io_error(
            "read_state",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let ex: ExError = (&err).into();
        assert_eq!(ex.kind(), ExErrorKind::Io);
        assert_eq!(ex.op(), Some("read_state"));
        assert!(err.to_string().contains("read_state"));
    }

    #[test]
    fn test_limit_errors_are_constraint_violations() {
        let err = StoreError::TooManyEntries { count: 5, limit: 2 };
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }
}
