/*
 * Responsibility
 * - POST /login (認証なし)
 * - Authenticator で subject を決め、TokenCodec で token を発行する
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::login::{LoginRequest, LoginResponse};
use crate::error::{AppError, AuthError};
use crate::services::auth::LoginAttempt;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;

    let subject = state
        .login
        .authenticate(&LoginAttempt {
            user_id: req.user_id,
        })
        .await?;

    let issued = state.tokens.issue(subject).map_err(|e| {
        tracing::error!(error = %e, user_id = %subject, "token issuance failed");
        AuthError::IssuanceFailure
    })?;

    tracing::info!(user_id = %subject, expires_at = %issued.expires_at, "token issued");

    Ok(Json(LoginResponse {
        token: issued.token,
    }))
}
