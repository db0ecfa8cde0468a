// Errors returned by the todo store and its storage backends
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Due date '{0}' should be in format yyyy-mm-dd or dd.mm.yyyy")]
    InvalidDueDate(String),

    #[error("No task ids left after {0}")]
    IdsExhausted(u64),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    // Validation failures leave the store untouched and are not worth surfacing loudly
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::EmptyText | StoreError::InvalidDueDate(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_rejections() {
        assert!(StoreError::EmptyText.is_rejection());
        assert!(StoreError::InvalidDueDate("32.13.2023".into()).is_rejection());
        assert!(!StoreError::Database("locked".into()).is_rejection());
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: StoreError = serde_json::from_str::<Vec<u32>>("[1,")
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
