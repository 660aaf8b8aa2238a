//! Decomposition of a multi-day training request into daily records.
//!
//! [`decompose`] is pure: it validates the request and plans one
//! [`CreateTrainingDay`] per requested date, sorted by date with submission
//! order kept for equal dates. [`create_training`] then persists the plan one
//! day at a time. There is no cross-day transaction, so a store failure in
//! the middle surfaces as [`CoreError::PartialBatch`] with everything the
//! caller needs to reconcile.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CoreError, StoreError};
use crate::store::Store;
use crate::title_codec;
use crate::training::{CreateTrainingDay, DaySpec, TrainingDay, TrainingRequest, TrainingStatus};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject a request before anything is planned or written.
pub fn validate_request(request: &TrainingRequest) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    if let Some((index, spec)) = request
        .days
        .iter()
        .enumerate()
        .find(|(_, spec)| !spec.has_session())
    {
        return Err(CoreError::Validation(format!(
            "Day {} ({}) must have a morning or an afternoon session",
            index + 1,
            spec.date
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Effective start/end of a day: morning start to afternoon end when both
/// sessions exist, otherwise the single session's window.
///
/// Returns `None` for a spec without any session.
pub fn effective_window(spec: &DaySpec) -> Option<(NaiveTime, NaiveTime)> {
    match (&spec.morning, &spec.afternoon) {
        (Some(m), Some(a)) => Some((m.start, a.end)),
        (Some(m), None) => Some((m.start, m.end)),
        (None, Some(a)) => Some((a.start, a.end)),
        (None, None) => None,
    }
}

// ---------------------------------------------------------------------------
// Decomposition
// ---------------------------------------------------------------------------

/// Plan the daily records for `request`.
///
/// All-or-nothing: any validation failure returns before a single day is
/// produced. Every planned day shares a fresh `batch_id`.
pub fn decompose(request: &TrainingRequest) -> Result<Vec<CreateTrainingDay>, CoreError> {
    validate_request(request)?;

    let trainer_id = request
        .trainer_id
        .ok_or_else(|| CoreError::Validation("trainer_id is required".into()))?;

    let mut specs: Vec<&DaySpec> = request.days.iter().collect();
    // Stable: equal dates keep submission order.
    specs.sort_by_key(|spec| spec.date);

    let total = i32::try_from(specs.len())
        .map_err(|_| CoreError::Validation("Too many days in one training".into()))?;
    let batch_id = Uuid::new_v4();

    specs
        .into_iter()
        .zip(1..)
        .map(|(spec, seq)| {
            let (effective_start, effective_end) = effective_window(spec).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Day {} must have a morning or an afternoon session",
                    spec.date
                ))
            })?;

            Ok(CreateTrainingDay {
                batch_id,
                base_title: request.base_title.clone(),
                title: title_codec::encode(&request.base_title, seq, total),
                sequence_index: seq,
                total_days: total,
                date: spec.date,
                effective_start,
                effective_end,
                company: request.company.clone(),
                location: request.location.clone(),
                trainer_id,
                trainer_name: request.trainer_name.clone(),
                status: TrainingStatus::Scheduled,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Persistence loop
// ---------------------------------------------------------------------------

/// Outcome of a creation batch that stopped on a store error.
#[derive(Debug, Serialize)]
pub struct PartialBatchFailure {
    /// Days persisted before the failure, in sequence order.
    pub created: Vec<TrainingDay>,
    /// The day whose save failed.
    pub failed: CreateTrainingDay,
    /// Days after the failed one, never attempted.
    pub skipped: Vec<CreateTrainingDay>,
    #[serde(skip)]
    pub error: StoreError,
}

impl PartialBatchFailure {
    /// The days still missing from the store, in sequence order.
    pub fn retry_subset(&self) -> Vec<CreateTrainingDay> {
        std::iter::once(self.failed.clone())
            .chain(self.skipped.iter().cloned())
            .collect()
    }
}

impl fmt::Display for PartialBatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Training creation stopped at day {}/{} ({}): {} day(s) created, {} not persisted: {}",
            self.failed.sequence_index,
            self.failed.total_days,
            self.failed.date,
            self.created.len(),
            self.skipped.len() + 1,
            self.error,
        )
    }
}

/// Validate, decompose and persist a training, one day at a time.
///
/// Validation errors happen before any write. The first store error stops the
/// loop; already-saved days are not rolled back but returned inside
/// [`CoreError::PartialBatch`].
pub async fn create_training<S: Store + ?Sized>(
    store: &S,
    request: &TrainingRequest,
) -> Result<Vec<TrainingDay>, CoreError> {
    let planned = decompose(request)?;
    let total = planned.len();
    let mut created = Vec::with_capacity(total);
    let mut remaining = planned.into_iter();

    while let Some(day) = remaining.next() {
        match store.save_day(&day).await {
            Ok(saved) => {
                tracing::debug!(
                    day_id = saved.id,
                    seq = saved.sequence_index,
                    total,
                    "Training day saved"
                );
                created.push(saved);
            }
            Err(error) => {
                tracing::error!(
                    seq = day.sequence_index,
                    total,
                    created = created.len(),
                    error = %error,
                    "Training day save failed, batch left partial"
                );
                return Err(CoreError::PartialBatch(Box::new(PartialBatchFailure {
                    created,
                    failed: day,
                    skipped: remaining.collect(),
                    error,
                })));
            }
        }
    }

    tracing::info!(
        batch_id = ?created.first().map(|d| d.batch_id),
        days = created.len(),
        "Training created"
    );
    Ok(created)
}
