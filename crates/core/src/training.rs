//! Training request and materialized training day types.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// A start/end time window for one half-day session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// One requested calendar day with its morning and/or afternoon windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpec {
    pub date: NaiveDate,
    #[serde(default)]
    pub morning: Option<SessionWindow>,
    #[serde(default)]
    pub afternoon: Option<SessionWindow>,
}

impl DaySpec {
    /// Whether at least one session is scheduled on this day.
    pub fn has_session(&self) -> bool {
        self.morning.is_some() || self.afternoon.is_some()
    }
}

/// A multi-day training creation request, days in submission order.
///
/// Missing text fields deserialize as empty so they fail validation the same
/// way blank ones do.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "base_title is required"))]
    pub base_title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "company is required"))]
    pub company: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "location is required"))]
    pub location: String,
    #[validate(required(message = "trainer_id is required"))]
    pub trainer_id: Option<DbId>,
    #[serde(default)]
    pub trainer_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one day is required"))]
    pub days: Vec<DaySpec>,
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Materialized side
// ---------------------------------------------------------------------------

/// Lifecycle status of a training day. The attendance subsystem never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl TrainingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown training status: '{other}'")),
        }
    }
}

/// A decomposed day, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTrainingDay {
    pub batch_id: Uuid,
    pub base_title: String,
    pub title: String,
    pub sequence_index: i32,
    pub total_days: i32,
    pub date: NaiveDate,
    pub effective_start: NaiveTime,
    pub effective_end: NaiveTime,
    pub company: String,
    pub location: String,
    pub trainer_id: DbId,
    pub trainer_name: String,
    pub status: TrainingStatus,
}

/// A persisted training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingDay {
    pub id: DbId,
    pub batch_id: Uuid,
    pub base_title: String,
    pub title: String,
    pub sequence_index: i32,
    pub total_days: i32,
    pub date: NaiveDate,
    pub effective_start: NaiveTime,
    pub effective_end: NaiveTime,
    pub company: String,
    pub location: String,
    pub trainer_id: DbId,
    pub trainer_name: String,
    pub status: TrainingStatus,
    pub created_at: Timestamp,
}

impl TrainingDay {
    /// Attach a store-assigned id to a planned day.
    pub fn from_created(id: DbId, day: CreateTrainingDay, created_at: Timestamp) -> Self {
        Self {
            id,
            batch_id: day.batch_id,
            base_title: day.base_title,
            title: day.title,
            sequence_index: day.sequence_index,
            total_days: day.total_days,
            date: day.date,
            effective_start: day.effective_start,
            effective_end: day.effective_end,
            company: day.company,
            location: day.location,
            trainer_id: day.trainer_id,
            trainer_name: day.trainer_name,
            status: day.status,
            created_at,
        }
    }
}

/// Days of one creation batch, ordered by `sequence_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingGroup {
    pub batch_id: Uuid,
    pub base_title: String,
    pub days: Vec<TrainingDay>,
}

/// Regroup persisted days by creation batch.
///
/// Groups are ordered by their first day's date; days inside a group by
/// `sequence_index`.
pub fn group_by_batch(days: Vec<TrainingDay>) -> Vec<TrainingGroup> {
    let mut groups: Vec<TrainingGroup> = Vec::new();

    for day in days {
        match groups.iter_mut().find(|g| g.batch_id == day.batch_id) {
            Some(group) => group.days.push(day),
            None => groups.push(TrainingGroup {
                batch_id: day.batch_id,
                base_title: day.base_title.clone(),
                days: vec![day],
            }),
        }
    }

    for group in &mut groups {
        group.days.sort_by_key(|d| d.sequence_index);
    }
    groups.sort_by_key(|g| g.days.first().map(|d| d.date));
    groups
}

/// A participant invited to one training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: DbId,
    pub training_day_id: DbId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
}
