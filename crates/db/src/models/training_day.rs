//! Training day rows.

use chrono::{NaiveDate, NaiveTime};
use emargement_core::error::StoreError;
use emargement_core::training::{TrainingDay, TrainingStatus};
use emargement_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `training_days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingDayRow {
    pub id: DbId,
    pub batch_id: Uuid,
    pub base_title: String,
    pub title: String,
    pub sequence_index: i32,
    pub total_days: i32,
    pub training_date: NaiveDate,
    pub effective_start: NaiveTime,
    pub effective_end: NaiveTime,
    pub company: String,
    pub location: String,
    pub trainer_id: DbId,
    pub trainer_name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TrainingDayRow> for TrainingDay {
    type Error = StoreError;

    fn try_from(row: TrainingDayRow) -> Result<Self, Self::Error> {
        let status: TrainingStatus = row.status.parse().map_err(StoreError::backend)?;
        Ok(TrainingDay {
            id: row.id,
            batch_id: row.batch_id,
            base_title: row.base_title,
            title: row.title,
            sequence_index: row.sequence_index,
            total_days: row.total_days,
            date: row.training_date,
            effective_start: row.effective_start,
            effective_end: row.effective_end,
            company: row.company,
            location: row.location,
            trainer_id: row.trainer_id,
            trainer_name: row.trainer_name,
            status,
            created_at: row.created_at,
        })
    }
}
