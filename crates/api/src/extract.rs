//! Request body extractor whose rejections use the API error format.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` that answers malformed bodies with an [`AppError`] instead of
/// axum's plain-text rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
