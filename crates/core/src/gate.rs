//! Signature gate: the single entry point for recording attendance signatures.
//!
//! Both the individual signing link and the session-wide QR page go through
//! [`SignatureGate::attempt_sign`]. The gate enforces at most one signature
//! per participant and session on top of the [`AggregateStatus`] reducer and
//! resolves concurrent writers with the store's compare-and-set.

use serde::Serialize;

use crate::attendance::{AggregateStatus, AttendanceRecord, Session};
use crate::error::{CoreError, StoreError};
use crate::store::{ParticipantDirectory, Store};
use crate::training::{Participant, TrainingDay};
use crate::types::{DbId, Timestamp};

/// Default number of read-check-write rounds before giving up on a hot record.
pub const DEFAULT_MAX_SIGN_ATTEMPTS: u32 = 3;

/// Tuning for the optimistic-concurrency loop.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    pub max_attempts: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_SIGN_ATTEMPTS,
        }
    }
}

/// One line of a day's attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantAttendance {
    pub participant: Participant,
    pub status: AggregateStatus,
    pub morning_signed_at: Option<Timestamp>,
    pub afternoon_signed_at: Option<Timestamp>,
}

pub struct SignatureGate<'a, S: ?Sized, D: ?Sized> {
    store: &'a S,
    directory: &'a D,
    config: GateConfig,
}

impl<'a, S, D> SignatureGate<'a, S, D>
where
    S: Store + ?Sized,
    D: ParticipantDirectory + ?Sized,
{
    pub fn new(store: &'a S, directory: &'a D) -> Self {
        Self::with_config(store, directory, GateConfig::default())
    }

    pub fn with_config(store: &'a S, directory: &'a D, config: GateConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// Participants of `day_id` who can still sign `session`.
    pub async fn eligible_participants(
        &self,
        day_id: DbId,
        session: Session,
    ) -> Result<Vec<Participant>, CoreError> {
        let sheet = self.attendance_sheet(day_id).await?;
        Ok(sheet
            .into_iter()
            .filter(|line| !line.status.covers(session))
            .map(|line| line.participant)
            .collect())
    }

    /// Every participant of `day_id` with their current attendance.
    pub async fn attendance_sheet(
        &self,
        day_id: DbId,
    ) -> Result<Vec<ParticipantAttendance>, CoreError> {
        self.require_day(day_id).await?;

        let participants = self.directory.list_participants(day_id).await?;
        let records = self.store.list_attendance(day_id).await?;

        Ok(participants
            .into_iter()
            .map(|participant| {
                let record = records.iter().find(|r| r.participant_id == participant.id);
                ParticipantAttendance {
                    status: record.map_or(AggregateStatus::Unsigned, |r| r.aggregate_status()),
                    morning_signed_at: record.and_then(|r| r.morning.as_ref()).map(|s| s.signed_at),
                    afternoon_signed_at: record
                        .and_then(|r| r.afternoon.as_ref())
                        .map(|s| s.signed_at),
                    participant,
                }
            })
            .collect())
    }

    /// Record `participant_id`'s signature for `session` on `day_id`.
    ///
    /// Fails with [`CoreError::AlreadySigned`] when the latest stored state
    /// already covers `session`; nothing is written in that case. On a
    /// version conflict the record is re-read and re-evaluated, so the loser
    /// of a race on the same session sees `AlreadySigned` while a race on the
    /// other session still succeeds.
    pub async fn attempt_sign(
        &self,
        day_id: DbId,
        participant_id: DbId,
        session: Session,
        signature: String,
        at: Timestamp,
    ) -> Result<AttendanceRecord, CoreError> {
        self.require_day(day_id).await?;
        self.require_participant(day_id, participant_id).await?;

        for attempt in 1..=self.config.max_attempts.max(1) {
            let current = self
                .store
                .find_attendance(day_id, participant_id)
                .await?
                .unwrap_or_else(|| AttendanceRecord::unsigned(day_id, participant_id));

            if current.aggregate_status().covers(session) {
                tracing::debug!(day_id, participant_id, %session, "Session already signed");
                return Err(CoreError::AlreadySigned {
                    participant_id,
                    session,
                });
            }

            let next = current.with_signature(session, signature.clone(), at);
            match self.store.upsert_attendance(&next).await {
                Ok(saved) => {
                    tracing::info!(
                        day_id,
                        participant_id,
                        %session,
                        status = saved.aggregate_status().label(),
                        "Signature recorded"
                    );
                    return Ok(saved);
                }
                Err(StoreError::VersionConflict) => {
                    tracing::warn!(
                        day_id,
                        participant_id,
                        %session,
                        attempt,
                        "Concurrent attendance write, re-evaluating"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(CoreError::Conflict(format!(
            "Attendance of participant {participant_id} on day {day_id} kept changing, retry later"
        )))
    }

    async fn require_day(&self, day_id: DbId) -> Result<TrainingDay, CoreError> {
        self.store
            .find_day(day_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TrainingDay",
                id: day_id,
            })
    }

    async fn require_participant(
        &self,
        day_id: DbId,
        participant_id: DbId,
    ) -> Result<Participant, CoreError> {
        self.directory
            .find_participant(participant_id)
            .await?
            .filter(|p| p.training_day_id == day_id)
            .ok_or(CoreError::NotFound {
                entity: "Participant",
                id: participant_id,
            })
    }
}
