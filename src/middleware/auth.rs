//! JWT authentication extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::services::auth as auth_service;
use crate::AppState;

/// Caller identified by a verified Bearer token.
///
/// `role` is `None` when the token carries no role, or one this service does
/// not know.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(authorization) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::missing_credentials())?;

        let token = authorization.token().trim();
        if token.is_empty() {
            return Err(AppError::missing_credentials());
        }

        let claims = auth_service::validate_token(token, &state.config.jwt_secret)?;

        Ok(CurrentUser {
            role: claims.role.as_deref().and_then(UserRole::from_claim),
            id: claims.sub,
            email: claims.email,
        })
    }
}
