use crate::attendance::Session;
use crate::decomposer::PartialBatchFailure;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Participant {participant_id} has already signed the {session} session")]
    AlreadySigned {
        participant_id: DbId,
        session: Session,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    PartialBatch(Box<PartialBatchFailure>),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Failure reported by a [`Store`](crate::store::Store) or
/// [`ParticipantDirectory`](crate::store::ParticipantDirectory) adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A compare-and-set write lost against a concurrent writer.
    #[error("Version conflict: the record was modified concurrently")]
    VersionConflict,

    #[error("Backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap any backend error (sqlx, I/O, a poisoned lock message...).
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}
