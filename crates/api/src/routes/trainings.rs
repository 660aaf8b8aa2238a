use axum::routing::post;
use axum::Router;

use crate::handlers::training;
use crate::state::AppState;

/// Training creation routes, nested under `/trainings`.
///
/// ```text
/// POST   /                 create_training
/// POST   /preview          preview_training
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(training::create_training))
        .route("/preview", post(training::preview_training))
}
