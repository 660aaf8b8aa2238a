//! Participant rows.

use emargement_core::training::Participant;
use emargement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipantRow {
    pub id: DbId,
    pub training_day_id: DbId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inviting a participant to a training day.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParticipant {
    pub training_day_id: DbId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Participant {
            id: row.id,
            training_day_id: row.training_day_id,
            name: row.name,
            email: row.email,
            company: row.company,
        }
    }
}
