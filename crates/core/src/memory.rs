//! In-memory [`Store`] and [`ParticipantDirectory`].
//!
//! Backs tests and database-less local runs. Writes honour the same
//! compare-and-set contract as the PostgreSQL adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::attendance::AttendanceRecord;
use crate::error::StoreError;
use crate::store::{ParticipantDirectory, Store};
use crate::training::{CreateTrainingDay, Participant, TrainingDay};
use crate::types::DbId;

#[derive(Default)]
struct Tables {
    next_id: DbId,
    days: Vec<TrainingDay>,
    participants: Vec<Participant>,
    attendance: HashMap<(DbId, DbId), AttendanceRecord>,
    /// Remaining successful `save_day` calls before saves start failing.
    save_budget: Option<usize>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more day saves succeed, then fail every following one.
    pub fn fail_saves_after(&self, n: usize) -> Result<(), StoreError> {
        self.lock()?.save_budget = Some(n);
        Ok(())
    }

    /// Invite a participant to a day, returning it with its assigned id.
    pub fn add_participant(
        &self,
        training_day_id: DbId,
        name: &str,
        email: &str,
        company: Option<&str>,
    ) -> Result<Participant, StoreError> {
        let mut tables = self.lock()?;
        let participant = Participant {
            id: tables.allocate_id(),
            training_day_id,
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
        };
        tables.participants.push(participant.clone());
        Ok(participant)
    }

    /// Every stored day, in insertion order.
    pub fn days(&self) -> Result<Vec<TrainingDay>, StoreError> {
        Ok(self.lock()?.days.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::backend(format!("in-memory store poisoned: {e}")))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save_day(&self, day: &CreateTrainingDay) -> Result<TrainingDay, StoreError> {
        let mut tables = self.lock()?;
        if let Some(budget) = tables.save_budget.as_mut() {
            if *budget == 0 {
                return Err(StoreError::backend("save budget exhausted"));
            }
            *budget -= 1;
        }

        let id = tables.allocate_id();
        let saved = TrainingDay::from_created(id, day.clone(), chrono::Utc::now());
        tables.days.push(saved.clone());
        Ok(saved)
    }

    async fn find_day(&self, id: DbId) -> Result<Option<TrainingDay>, StoreError> {
        Ok(self.lock()?.days.iter().find(|d| d.id == id).cloned())
    }

    async fn delete_day(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        let before = tables.days.len();
        tables.days.retain(|d| d.id != id);
        if tables.days.len() == before {
            return Ok(false);
        }
        tables.attendance.retain(|(day_id, _), _| *day_id != id);
        tables.participants.retain(|p| p.training_day_id != id);
        Ok(true)
    }

    async fn find_attendance(
        &self,
        training_day_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .lock()?
            .attendance
            .get(&(training_day_id, participant_id))
            .cloned())
    }

    async fn list_attendance(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let tables = self.lock()?;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| r.training_day_id == training_day_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.participant_id);
        Ok(records)
    }

    async fn upsert_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut tables = self.lock()?;
        let key = (record.training_day_id, record.participant_id);
        let stored_version = tables.attendance.get(&key).map_or(0, |r| r.version);

        if stored_version != record.version {
            return Err(StoreError::VersionConflict);
        }

        let saved = AttendanceRecord {
            version: record.version + 1,
            ..record.clone()
        };
        tables.attendance.insert(key, saved.clone());
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryStore {
    async fn list_participants(
        &self,
        training_day_id: DbId,
    ) -> Result<Vec<Participant>, StoreError> {
        Ok(self
            .lock()?
            .participants
            .iter()
            .filter(|p| p.training_day_id == training_day_id)
            .cloned()
            .collect())
    }

    async fn find_participant(&self, id: DbId) -> Result<Option<Participant>, StoreError> {
        Ok(self.lock()?.participants.iter().find(|p| p.id == id).cloned())
    }
}
