//! Repository for the `attendance_records` table.
//!
//! Writes are compare-and-set on `version`: they return `None` instead of
//! touching a row that changed since it was read.

use emargement_core::attendance::{AttendanceRecord, SessionSignature};
use emargement_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::attendance::AttendanceRow;

const COLUMNS: &str = "id, training_day_id, participant_id, morning_signed_at, \
    morning_signature, afternoon_signed_at, afternoon_signature, version, \
    created_at, updated_at";

pub struct AttendanceRepo;

impl AttendanceRepo {
    pub async fn find(
        pool: &PgPool,
        training_day_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records
             WHERE training_day_id = $1 AND participant_id = $2"
        );
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(training_day_id)
            .bind(participant_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_day(
        pool: &PgPool,
        training_day_id: DbId,
    ) -> Result<Vec<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records
             WHERE training_day_id = $1
             ORDER BY participant_id ASC"
        );
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(training_day_id)
            .fetch_all(pool)
            .await
    }

    /// Insert the first record of a participant for a day.
    ///
    /// Returns `None` if another writer already inserted one.
    pub async fn insert(
        pool: &PgPool,
        record: &AttendanceRecord,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_records
                (training_day_id, participant_id, morning_signed_at, morning_signature,
                 afternoon_signed_at, afternoon_signature, version)
             VALUES ($1, $2, $3, $4, $5, $6, 1)
             ON CONFLICT (training_day_id, participant_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let (morning_at, morning_sig) = split(record.morning.as_ref());
        let (afternoon_at, afternoon_sig) = split(record.afternoon.as_ref());
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(record.training_day_id)
            .bind(record.participant_id)
            .bind(morning_at)
            .bind(morning_sig)
            .bind(afternoon_at)
            .bind(afternoon_sig)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the session columns if the stored version is still
    /// `record.version`, bumping it.
    ///
    /// Returns `None` when the version no longer matches.
    pub async fn update_if_version(
        pool: &PgPool,
        record: &AttendanceRecord,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance_records SET
                morning_signed_at = $3,
                morning_signature = $4,
                afternoon_signed_at = $5,
                afternoon_signature = $6,
                version = version + 1,
                updated_at = now()
             WHERE training_day_id = $1 AND participant_id = $2 AND version = $7
             RETURNING {COLUMNS}"
        );
        let (morning_at, morning_sig) = split(record.morning.as_ref());
        let (afternoon_at, afternoon_sig) = split(record.afternoon.as_ref());
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(record.training_day_id)
            .bind(record.participant_id)
            .bind(morning_at)
            .bind(morning_sig)
            .bind(afternoon_at)
            .bind(afternoon_sig)
            .bind(record.version)
            .fetch_optional(pool)
            .await
    }
}

fn split(slot: Option<&SessionSignature>) -> (Option<Timestamp>, Option<&str>) {
    match slot {
        Some(s) => (Some(s.signed_at), s.signature.as_deref()),
        None => (None, None),
    }
}
