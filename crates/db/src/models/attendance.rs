//! Attendance record rows.
//!
//! A session is signed exactly when its `*_signed_at` column is non-null.

use emargement_core::attendance::{AttendanceRecord, SessionSignature};
use emargement_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceRow {
    pub id: DbId,
    pub training_day_id: DbId,
    pub participant_id: DbId,
    pub morning_signed_at: Option<Timestamp>,
    pub morning_signature: Option<String>,
    pub afternoon_signed_at: Option<Timestamp>,
    pub afternoon_signature: Option<String>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn slot(signed_at: Option<Timestamp>, signature: Option<String>) -> Option<SessionSignature> {
    signed_at.map(|signed_at| SessionSignature {
        signed_at,
        signature,
    })
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            training_day_id: row.training_day_id,
            participant_id: row.participant_id,
            morning: slot(row.morning_signed_at, row.morning_signature),
            afternoon: slot(row.afternoon_signed_at, row.afternoon_signature),
            version: row.version,
        }
    }
}
