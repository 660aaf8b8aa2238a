//! Role gates layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use emargement_core::error::CoreError;
use emargement_core::roles::{ROLE_ADMIN, ROLE_TRAINER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(denied.into())));
    }
    Ok(user)
}

/// Back-office administrators: training creation and deletion.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[ROLE_ADMIN], "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Trainers and admins, who run sessions and follow attendance.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(
            parts,
            state,
            &[ROLE_ADMIN, ROLE_TRAINER],
            "Trainer or Admin role required",
        )
        .await
        .map(RequireStaff)
    }
}
