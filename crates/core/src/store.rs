//! Persistence ports consumed by the decomposer and the signature gate.
//!
//! Adapters live outside this crate (`emargement-db` for PostgreSQL) except
//! for the in-memory store in [`crate::memory`].

use async_trait::async_trait;

use crate::attendance::AttendanceRecord;
use crate::error::StoreError;
use crate::training::{CreateTrainingDay, Participant, TrainingDay};
use crate::types::DbId;

/// Storage for training days and attendance records.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist one planned day, returning the stored row.
    async fn save_day(&self, day: &CreateTrainingDay) -> Result<TrainingDay, StoreError>;

    async fn find_day(&self, id: DbId) -> Result<Option<TrainingDay>, StoreError>;

    /// Remove a day together with its attendance records.
    /// Returns `false` when no such day existed.
    async fn delete_day(&self, id: DbId) -> Result<bool, StoreError>;

    async fn find_attendance(
        &self,
        training_day_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    async fn list_attendance(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Compare-and-set write keyed on `record.version`.
    ///
    /// Version `0` inserts and conflicts if a row already exists; any other
    /// version updates only if the stored version still matches. The returned
    /// record carries the new version. A lost race is
    /// [`StoreError::VersionConflict`].
    async fn upsert_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Liveness check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Read-only view of invited participants.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    async fn list_participants(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<Participant>, StoreError>;

    async fn find_participant(&self, id: DbId) -> Result<Option<Participant>, StoreError>;
}
