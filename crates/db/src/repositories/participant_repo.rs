//! Repository for the `participants` table.

use emargement_core::types::DbId;
use sqlx::PgPool;

use crate::models::participant::{CreateParticipant, ParticipantRow};

const COLUMNS: &str = "id, training_day_id, name, email, company, created_at";

pub struct ParticipantRepo;

impl ParticipantRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateParticipant,
    ) -> Result<ParticipantRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO participants (training_day_id, name, email, company)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(input.training_day_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ParticipantRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE id = $1");
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Participants of a day, in invitation order.
    pub async fn list_for_day(
        pool: &PgPool,
        training_day_id: DbId,
    ) -> Result<Vec<ParticipantRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM participants
             WHERE training_day_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ParticipantRow>(&query)
            .bind(training_day_id)
            .fetch_all(pool)
            .await
    }
}
