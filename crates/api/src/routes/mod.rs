pub mod health;
pub mod training_days;
pub mod trainings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /trainings        decomposition and creation
/// /training-days    day detail, attendance and signatures
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/trainings", trainings::router())
        .nest("/training-days", training_days::router())
}
