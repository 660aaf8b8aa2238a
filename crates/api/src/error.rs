use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emargement_core::decomposer::PartialBatchFailure;
use emargement_core::error::{CoreError, StoreError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `emargement_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request body that could not be read as the expected JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(CoreError::Store(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Core(CoreError::PartialBatch(failure)) = &self {
            return partial_batch_response(failure);
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::AlreadySigned { .. } => {
                    (StatusCode::CONFLICT, "ALREADY_SIGNED", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Store(err) => classify_store_error(err),
                CoreError::PartialBatch(_) => {
                    tracing::error!(error = %core, "Internal core error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// 500 with enough detail for an operator to finish or clean up the batch.
///
/// The store error itself is logged, never returned.
fn partial_batch_response(failure: &PartialBatchFailure) -> Response {
    tracing::error!(
        batch_id = %failure.failed.batch_id,
        created = failure.created.len(),
        error = %failure.error,
        "Training batch partially persisted"
    );

    let body = json!({
        "error": format!(
            "Training creation stopped at day {}/{} ({})",
            failure.failed.sequence_index, failure.failed.total_days, failure.failed.date
        ),
        "code": "PARTIAL_BATCH_FAILURE",
        "details": {
            "batch_id": failure.failed.batch_id,
            "created_day_ids": failure.created.iter().map(|d| d.id).collect::<Vec<_>>(),
            "failed_date": failure.failed.date,
            "not_persisted_dates": failure
                .retry_subset()
                .iter()
                .map(|d| d.date)
                .collect::<Vec<_>>(),
        },
    });

    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - A lost compare-and-set race maps to 409.
/// - sqlx errors are classified by [`classify_sqlx_error`].
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::VersionConflict => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::Backend(source) => match source.downcast_ref::<sqlx::Error>() {
            Some(sqlx_err) => classify_sqlx_error(sqlx_err),
            None => {
                tracing::error!(error = %source, "Store error");
                internal()
            }
        },
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
