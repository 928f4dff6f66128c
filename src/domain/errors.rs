//! Domain errors for the exploration statistics engine.

use thiserror::Error;

/// Domain-level errors that can occur while recording or analyzing statistics.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Malformed content in exploration '{exploration_id}': {reason}")]
    MalformedContent {
        exploration_id: String,
        reason: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub(crate) fn malformed(exploration_id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            exploration_id: exploration_id.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}
