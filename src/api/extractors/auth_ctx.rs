/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型 (AuthCtx)
 * - middleware::auth が検証して request extensions に格納し、handler は CurrentUser で受け取る
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{AppError, AuthError};
use crate::services::auth::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Identity,
}

impl AuthCtx {
    pub fn new(user_id: Identity) -> Self {
        Self { user_id }
    }
}

/// Handler で AuthCtx を受け取るための extractor
/// middleware が insert 済みである前提。見つからない場合は 401
/// (認証 middleware が掛かっていない route で使われた)
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub AuthCtx);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .copied()
            .map(CurrentUser)
            .ok_or(AppError::Auth(AuthError::MissingCredential))
    }
}
