//! Per-participant, per-day attendance state.
//!
//! [`AggregateStatus`] is a total, monotonic reducer over signing events:
//! every transition moves forward or stays put, and [`AggregateStatus::FullDay`]
//! is terminal. Rejecting a repeated signature is a policy of the signature
//! gate, not of the reducer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A half-day sub-period that is signed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Morning,
    Afternoon,
}

impl Session {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            other => Err(format!(
                "Unknown session: '{other}'. Valid sessions: morning, afternoon"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate status reducer
// ---------------------------------------------------------------------------

/// Derived attendance state of a participant for one training day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    Unsigned,
    MorningOnly,
    AfternoonOnly,
    FullDay,
}

impl AggregateStatus {
    /// Status implied by the two session flags.
    pub fn from_flags(morning_signed: bool, afternoon_signed: bool) -> Self {
        match (morning_signed, afternoon_signed) {
            (false, false) => Self::Unsigned,
            (true, false) => Self::MorningOnly,
            (false, true) => Self::AfternoonOnly,
            (true, true) => Self::FullDay,
        }
    }

    /// Status after signing `session`. Never fails; already-covered sessions
    /// leave the status unchanged.
    pub fn apply(self, session: Session) -> Self {
        match (self, session) {
            (Self::Unsigned, Session::Morning) => Self::MorningOnly,
            (Self::Unsigned, Session::Afternoon) => Self::AfternoonOnly,
            (Self::MorningOnly, Session::Morning) => Self::MorningOnly,
            (Self::MorningOnly, Session::Afternoon) => Self::FullDay,
            (Self::AfternoonOnly, Session::Morning) => Self::FullDay,
            (Self::AfternoonOnly, Session::Afternoon) => Self::AfternoonOnly,
            (Self::FullDay, _) => Self::FullDay,
        }
    }

    /// Whether `session` is already signed in this status.
    pub fn covers(self, session: Session) -> bool {
        match self {
            Self::Unsigned => false,
            Self::MorningOnly => session == Session::Morning,
            Self::AfternoonOnly => session == Session::Afternoon,
            Self::FullDay => true,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unsigned => "Unsigned",
            Self::MorningOnly => "Morning only",
            Self::AfternoonOnly => "Afternoon only",
            Self::FullDay => "Full day",
        }
    }
}

/// Free-function form of [`AggregateStatus::apply`].
pub fn apply(current: AggregateStatus, session: Session) -> AggregateStatus {
    current.apply(session)
}

// ---------------------------------------------------------------------------
// Attendance record
// ---------------------------------------------------------------------------

/// Proof of one signed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSignature {
    pub signed_at: Timestamp,
    /// Encoded signature image, as captured by the signing page.
    pub signature: Option<String>,
}

/// Attendance of one participant on one training day.
///
/// `version` is the optimistic-concurrency token of the stored row;
/// `0` means the record has never been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub training_day_id: DbId,
    pub participant_id: DbId,
    pub morning: Option<SessionSignature>,
    pub afternoon: Option<SessionSignature>,
    pub version: i64,
}

impl AttendanceRecord {
    /// An unsaved record with no session signed.
    pub fn unsigned(training_day_id: DbId, participant_id: DbId) -> Self {
        Self {
            training_day_id,
            participant_id,
            morning: None,
            afternoon: None,
            version: 0,
        }
    }

    pub fn morning_signed(&self) -> bool {
        self.morning.is_some()
    }

    pub fn afternoon_signed(&self) -> bool {
        self.afternoon.is_some()
    }

    /// Always recomputed from the session slots, never stored.
    pub fn aggregate_status(&self) -> AggregateStatus {
        AggregateStatus::from_flags(self.morning_signed(), self.afternoon_signed())
    }

    pub fn session(&self, session: Session) -> Option<&SessionSignature> {
        match session {
            Session::Morning => self.morning.as_ref(),
            Session::Afternoon => self.afternoon.as_ref(),
        }
    }

    /// Copy of this record with `session` signed.
    ///
    /// An already-signed session keeps its original signature and time, so a
    /// signature can never be cleared or overwritten through this path.
    pub fn with_signature(&self, session: Session, signature: String, at: Timestamp) -> Self {
        let mut next = self.clone();
        let slot = match session {
            Session::Morning => &mut next.morning,
            Session::Afternoon => &mut next.afternoon,
        };
        if slot.is_none() {
            *slot = Some(SessionSignature {
                signed_at: at,
                signature: Some(signature),
            });
        }
        debug_assert_eq!(
            next.aggregate_status(),
            self.aggregate_status().apply(session)
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ALL: [AggregateStatus; 4] = [
        AggregateStatus::Unsigned,
        AggregateStatus::MorningOnly,
        AggregateStatus::AfternoonOnly,
        AggregateStatus::FullDay,
    ];

    // -- apply ----------------------------------------------------------------

    #[test]
    fn transition_table() {
        use AggregateStatus::*;
        let cases = [
            (Unsigned, Session::Morning, MorningOnly),
            (Unsigned, Session::Afternoon, AfternoonOnly),
            (MorningOnly, Session::Morning, MorningOnly),
            (MorningOnly, Session::Afternoon, FullDay),
            (AfternoonOnly, Session::Morning, FullDay),
            (AfternoonOnly, Session::Afternoon, AfternoonOnly),
            (FullDay, Session::Morning, FullDay),
            (FullDay, Session::Afternoon, FullDay),
        ];
        for (current, session, expected) in cases {
            assert_eq!(apply(current, session), expected, "{current:?} + {session}");
        }
    }

    #[test]
    fn order_independent_full_day() {
        let a = AggregateStatus::Unsigned
            .apply(Session::Morning)
            .apply(Session::Afternoon);
        let b = AggregateStatus::Unsigned
            .apply(Session::Afternoon)
            .apply(Session::Morning);
        assert_eq!(a, AggregateStatus::FullDay);
        assert_eq!(a, b);
    }

    #[test]
    fn apply_never_loses_a_signed_session() {
        for status in ALL {
            for applied in [Session::Morning, Session::Afternoon] {
                let next = status.apply(applied);
                for s in [Session::Morning, Session::Afternoon] {
                    if status.covers(s) {
                        assert!(next.covers(s), "{status:?} + {applied} dropped {s}");
                    }
                }
                assert!(next.covers(applied));
            }
        }
    }

    #[test]
    fn from_flags_matches_reducer() {
        assert_eq!(AggregateStatus::from_flags(false, false), AggregateStatus::Unsigned);
        assert_eq!(
            AggregateStatus::from_flags(true, false),
            AggregateStatus::Unsigned.apply(Session::Morning)
        );
        assert_eq!(
            AggregateStatus::from_flags(false, true),
            AggregateStatus::Unsigned.apply(Session::Afternoon)
        );
        assert_eq!(AggregateStatus::from_flags(true, true), AggregateStatus::FullDay);
    }

    // -- covers ---------------------------------------------------------------

    #[test]
    fn covers_per_status() {
        assert!(!AggregateStatus::Unsigned.covers(Session::Morning));
        assert!(!AggregateStatus::Unsigned.covers(Session::Afternoon));
        assert!(AggregateStatus::MorningOnly.covers(Session::Morning));
        assert!(!AggregateStatus::MorningOnly.covers(Session::Afternoon));
        assert!(!AggregateStatus::AfternoonOnly.covers(Session::Morning));
        assert!(AggregateStatus::AfternoonOnly.covers(Session::Afternoon));
        assert!(AggregateStatus::FullDay.covers(Session::Morning));
        assert!(AggregateStatus::FullDay.covers(Session::Afternoon));
    }

    // -- Session --------------------------------------------------------------

    #[test]
    fn session_parses_path_segments() {
        assert_eq!("morning".parse::<Session>(), Ok(Session::Morning));
        assert_eq!("afternoon".parse::<Session>(), Ok(Session::Afternoon));
        assert!("evening".parse::<Session>().is_err());
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&AggregateStatus::MorningOnly).unwrap(),
            "\"morning_only\""
        );
        assert_eq!(serde_json::to_string(&Session::Afternoon).unwrap(), "\"afternoon\"");
    }

    // -- AttendanceRecord -----------------------------------------------------

    #[test]
    fn signing_fills_only_the_requested_slot() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap();
        let record = AttendanceRecord::unsigned(1, 2).with_signature(
            Session::Afternoon,
            "data:image/png;base64,AAA".into(),
            at,
        );
        assert!(record.morning.is_none());
        assert_eq!(record.afternoon.as_ref().unwrap().signed_at, at);
        assert_eq!(record.aggregate_status(), AggregateStatus::AfternoonOnly);
        assert_eq!(record.version, 0);
    }

    #[test]
    fn re_signing_keeps_the_first_signature() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
        let record = AttendanceRecord::unsigned(1, 2)
            .with_signature(Session::Morning, "first".into(), first)
            .with_signature(Session::Morning, "second".into(), later);

        let morning = record.session(Session::Morning).unwrap();
        assert_eq!(morning.signed_at, first);
        assert_eq!(morning.signature.as_deref(), Some("first"));
    }
}
