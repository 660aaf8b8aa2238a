//! Handlers for creating, reading and deleting trainings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use emargement_core::decomposer;
use emargement_core::error::CoreError;
use emargement_core::training::TrainingRequest;
use emargement_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/trainings/preview
///
/// Decompose a request without persisting anything, so the back office can
/// show the resulting days before confirming.
pub async fn preview_training(
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<TrainingRequest>,
) -> AppResult<impl IntoResponse> {
    let planned = decomposer::decompose(&input)?;
    Ok(Json(DataResponse { data: planned }))
}

/// POST /api/v1/trainings
///
/// Decompose and persist a training, one record per day.
pub async fn create_training(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<TrainingRequest>,
) -> AppResult<impl IntoResponse> {
    let days = decomposer::create_training(state.store.as_ref(), &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        base_title = %input.base_title,
        days = days.len(),
        "Training created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: days })))
}

/// GET /api/v1/training-days/{day_id}
pub async fn get_training_day(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(day_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let day = state
        .store
        .find_day(day_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TrainingDay",
            id: day_id,
        })?;
    Ok(Json(DataResponse { data: day }))
}

/// DELETE /api/v1/training-days/{day_id}
///
/// Removes one day with its participants and signatures. This is how an
/// operator cleans up the days of a partially created batch.
pub async fn delete_training_day(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(day_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.store.delete_day(day_id).await? {
        return Err(CoreError::NotFound {
            entity: "TrainingDay",
            id: day_id,
        }
        .into());
    }

    tracing::info!(user_id = admin.user_id, day_id, "Training day deleted");
    Ok(StatusCode::NO_CONTENT)
}
