//! [`Store`] and [`ParticipantDirectory`] backed by PostgreSQL.

use async_trait::async_trait;
use emargement_core::attendance::AttendanceRecord;
use emargement_core::error::StoreError;
use emargement_core::store::{ParticipantDirectory, Store};
use emargement_core::training::{CreateTrainingDay, Participant, TrainingDay};
use emargement_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{AttendanceRepo, ParticipantRepo, TrainingDayRepo};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn save_day(&self, day: &CreateTrainingDay) -> Result<TrainingDay, StoreError> {
        TrainingDayRepo::create(&self.pool, day)
            .await
            .map_err(StoreError::backend)?
            .try_into()
    }

    async fn find_day(&self, id: DbId) -> Result<Option<TrainingDay>, StoreError> {
        TrainingDayRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?
            .map(TrainingDay::try_from)
            .transpose()
    }

    async fn delete_day(&self, id: DbId) -> Result<bool, StoreError> {
        TrainingDayRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::backend)
    }

    async fn find_attendance(
        &self,
        training_day_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let row = AttendanceRepo::find(&self.pool, training_day_id, participant_id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }

    async fn list_attendance(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = AttendanceRepo::list_for_day(&self.pool, training_day_id)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let written = if record.version == 0 {
            AttendanceRepo::insert(&self.pool, record).await
        } else {
            AttendanceRepo::update_if_version(&self.pool, record).await
        }
        .map_err(StoreError::backend)?;

        match written {
            Some(row) => Ok(row.into()),
            None => {
                tracing::debug!(
                    day_id = record.training_day_id,
                    participant_id = record.participant_id,
                    version = record.version,
                    "Attendance write lost a version race"
                );
                Err(StoreError::VersionConflict)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}

#[async_trait]
impl ParticipantDirectory for PgStore {
    async fn list_participants(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<Participant>, StoreError> {
        let rows = ParticipantRepo::list_for_day(&self.pool, training_day_id)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_participant(&self, id: DbId) -> Result<Option<Participant>, StoreError> {
        let row = ParticipantRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(Into::into))
    }
}
