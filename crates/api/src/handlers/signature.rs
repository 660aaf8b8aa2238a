//! Attendance and signature handlers.
//!
//! The two public signing flows (session-wide QR page and individual link)
//! both end in [`SignatureGate::attempt_sign`](emargement_core::gate::SignatureGate::attempt_sign).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use emargement_core::attendance::{AggregateStatus, AttendanceRecord, Session};
use emargement_core::error::CoreError;
use emargement_core::training::Participant;
use emargement_core::types::{DbId, Timestamp};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of the session-wide QR signing page.
#[derive(Debug, Deserialize, Validate)]
pub struct SessionSignRequest {
    pub participant_id: DbId,
    #[serde(default)]
    #[validate(custom(
        function = "emargement_core::training::not_blank",
        message = "signature is required"
    ))]
    pub signature: String,
}

/// Body of the individual signing link.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkSignRequest {
    #[serde(default)]
    #[validate(custom(
        function = "emargement_core::training::not_blank",
        message = "signature is required"
    ))]
    pub signature: String,
}

/// What the public QR page may show about a participant.
#[derive(Debug, Serialize)]
pub struct EligibleParticipant {
    pub id: DbId,
    pub name: String,
    pub company: Option<String>,
}

impl From<Participant> for EligibleParticipant {
    fn from(p: Participant) -> Self {
        Self {
            id: p.id,
            name: p.name,
            company: p.company,
        }
    }
}

/// Confirmation returned after a successful signature.
#[derive(Debug, Serialize)]
pub struct SignatureReceipt {
    pub training_day_id: DbId,
    pub participant_id: DbId,
    pub session: Session,
    pub status: AggregateStatus,
    pub signed_at: Option<Timestamp>,
}

impl SignatureReceipt {
    fn new(record: &AttendanceRecord, session: Session) -> Self {
        Self {
            training_day_id: record.training_day_id,
            participant_id: record.participant_id,
            session,
            status: record.aggregate_status(),
            signed_at: record.session(session).map(|s| s.signed_at),
        }
    }
}

fn validated<T: Validate>(input: T) -> AppResult<T> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    Ok(input)
}

/// GET /api/v1/training-days/{day_id}/sessions/{session}/eligible
pub async fn list_eligible(
    State(state): State<AppState>,
    Path((day_id, session)): Path<(DbId, Session)>,
) -> AppResult<impl IntoResponse> {
    let eligible = state.gate().eligible_participants(day_id, session).await?;
    let data: Vec<EligibleParticipant> = eligible.into_iter().map(Into::into).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/training-days/{day_id}/attendance
pub async fn attendance_sheet(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(day_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let sheet = state.gate().attendance_sheet(day_id).await?;
    Ok(Json(DataResponse { data: sheet }))
}

/// POST /api/v1/training-days/{day_id}/sessions/{session}/signatures
///
/// Session-wide QR flow: the participant picks their name on the shared page.
pub async fn sign_session(
    State(state): State<AppState>,
    Path((day_id, session)): Path<(DbId, Session)>,
    AppJson(input): AppJson<SessionSignRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validated(input)?;
    let record = state
        .gate()
        .attempt_sign(
            day_id,
            input.participant_id,
            session,
            input.signature,
            chrono::Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignatureReceipt::new(&record, session),
        }),
    ))
}

/// POST /api/v1/training-days/{day_id}/participants/{participant_id}/signatures/{session}
///
/// Individual link flow: the participant is identified by the link itself.
pub async fn sign_link(
    State(state): State<AppState>,
    Path((day_id, participant_id, session)): Path<(DbId, DbId, Session)>,
    AppJson(input): AppJson<LinkSignRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validated(input)?;
    let record = state
        .gate()
        .attempt_sign(
            day_id,
            participant_id,
            session,
            input.signature,
            chrono::Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SignatureReceipt::new(&record, session),
        }),
    ))
}
