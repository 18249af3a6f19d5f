/*
 * Responsibility
 * - Decide which subject a login request may obtain a token for
 * - Kept behind a trait so a real credential check can replace OpenAuthenticator
 *   without touching the token codec or the auth middleware
 */
use async_trait::async_trait;
use tracing::warn;

use crate::error::AppError;
use crate::services::auth::identity::Identity;

/// What a client presents at `POST /login`.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub user_id: i64,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, attempt: &LoginAttempt) -> Result<Identity, AppError>;
}

/// Accepts any subject id without a credential check.
///
/// SECURITY: anyone who knows or guesses a user id can mint a token for it.
/// Only suitable for demos and local development.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAuthenticator;

#[async_trait]
impl Authenticator for OpenAuthenticator {
    async fn authenticate(&self, attempt: &LoginAttempt) -> Result<Identity, AppError> {
        warn!(
            user_id = attempt.user_id,
            "issuing token without credential check (OpenAuthenticator)"
        );
        Ok(Identity::new(attempt.user_id))
    }
}
