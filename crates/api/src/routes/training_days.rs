//! Routes for a single training day and its attendance.
//!
//! The eligibility and signing routes are public: participants reach them
//! through a QR code or a personal link, without an account.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{signature, training};
use crate::state::AppState;

/// Training day routes, nested under `/training-days`.
///
/// ```text
/// GET    /{day_id}                                                  get_training_day
/// DELETE /{day_id}                                                  delete_training_day
/// GET    /{day_id}/attendance                                       attendance_sheet
/// GET    /{day_id}/sessions/{session}/eligible                      list_eligible
/// POST   /{day_id}/sessions/{session}/signatures                    sign_session
/// POST   /{day_id}/participants/{participant_id}/signatures/{session}  sign_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{day_id}",
            get(training::get_training_day).delete(training::delete_training_day),
        )
        .route("/{day_id}/attendance", get(signature::attendance_sheet))
        .route(
            "/{day_id}/sessions/{session}/eligible",
            get(signature::list_eligible),
        )
        .route(
            "/{day_id}/sessions/{session}/signatures",
            post(signature::sign_session),
        )
        .route(
            "/{day_id}/participants/{participant_id}/signatures/{session}",
            post(signature::sign_link),
        )
}
