//! Repository for the `training_days` table.

use emargement_core::training::CreateTrainingDay;
use emargement_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::training_day::TrainingDayRow;

/// Column list for training_days queries.
const COLUMNS: &str = "id, batch_id, base_title, title, sequence_index, total_days, \
    training_date, effective_start, effective_end, company, location, \
    trainer_id, trainer_name, status, created_at, updated_at";

pub struct TrainingDayRepo;

impl TrainingDayRepo {
    /// Insert one planned day, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTrainingDay,
    ) -> Result<TrainingDayRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO training_days
                (batch_id, base_title, title, sequence_index, total_days, training_date,
                 effective_start, effective_end, company, location, trainer_id,
                 trainer_name, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingDayRow>(&query)
            .bind(input.batch_id)
            .bind(&input.base_title)
            .bind(&input.title)
            .bind(input.sequence_index)
            .bind(input.total_days)
            .bind(input.date)
            .bind(input.effective_start)
            .bind(input.effective_end)
            .bind(&input.company)
            .bind(&input.location)
            .bind(input.trainer_id)
            .bind(&input.trainer_name)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingDayRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM training_days WHERE id = $1");
        sqlx::query_as::<_, TrainingDayRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All days of one creation batch, in sequence order.
    pub async fn list_by_batch(
        pool: &PgPool,
        batch_id: Uuid,
    ) -> Result<Vec<TrainingDayRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM training_days
             WHERE batch_id = $1
             ORDER BY sequence_index ASC"
        );
        sqlx::query_as::<_, TrainingDayRow>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a day; participants and attendance cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM training_days WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
