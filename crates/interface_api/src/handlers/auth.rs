//! Login handler

use axum::{extract::State, Json};
use tracing::{info, instrument, warn};
use validator::Validate;

use domain_identity::{verify_password, CredentialError};

use crate::auth::create_token;
use crate::dto::auth::{LoginRequest, LoginResponse, UserSummary};
use crate::{error::ApiError, AppState};

/// Exchanges email and password for a bearer token
///
/// Unknown emails, wrong passwords and inactive accounts all get the same
/// 401 response.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .filter(|u| u.is_active)
        .ok_or(CredentialError::InvalidCredentials)?;

    verify_password(&request.password, &user.password_hash).map_err(|e| {
        if !matches!(e, CredentialError::InvalidCredentials) {
            warn!(user_id = %user.id, error = %e, "Stored credential unusable");
        }
        CredentialError::InvalidCredentials
    })?;

    let token = create_token(&user, &state.config.jwt_secret, state.config.jwt_expiration_secs)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.config.jwt_expiration_secs,
        user: UserSummary::from(&user),
    }))
}
