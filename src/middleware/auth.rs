//! `Authorization: Bearer <jwt>` 検証 → AuthCtx を extensions に入れる
//!
//! - header 無し / 空            → 401 "Authorization header missing"
//! - "Bearer " で始まらない      → 401 "Authorization format must be Bearer <token>"
//! - 署名・アルゴリズム・exp NG  → 401 "Invalid or expired token"
//!
//! 拒否時は handler を一切実行しない（`next.run` を呼ばない）。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::{AppError, AuthError};
use crate::services::auth::{Identity, TokenCodec};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// 保護したい route group に認証を掛ける。
///
/// `route_layer` なので、group 内に存在しない path は 401 ではなく 404 になる。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Continue (`Ok(identity)`) or halt (`Err`) decision for a single request.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenCodec) -> Result<Identity, AuthError> {
    let value = match headers.get(header::AUTHORIZATION) {
        None => return Err(AuthError::MissingCredential),
        Some(v) if v.is_empty() => return Err(AuthError::MissingCredential),
        Some(v) => v.to_str().map_err(|_| AuthError::MalformedCredential)?,
    };

    // 完全一致の prefix (大文字小文字を区別、スペース 1 つ)。
    // "Bearer " だけの場合も空トークンとして検証に回す。
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedCredential)?;

    tokens.verify(token).map_err(|err| {
        tracing::warn!(error = %err, "access token verification failed");
        AuthError::InvalidToken
    })
}

async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = authenticate(req.headers(), &state.tokens)?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::services::auth::token::DEFAULT_TTL_SECONDS;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"gate-test-secret", DEFAULT_TTL_SECONDS).unwrap()
    }

    fn headers(authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = authorization {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn missing_header_is_rejected_as_missing() {
        let codec = codec();
        assert_eq!(
            authenticate(&headers(None), &codec),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            authenticate(&headers(Some("")), &codec),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn wrong_scheme_is_rejected_as_malformed() {
        let codec = codec();
        let token = codec.issue(Identity::new(1)).unwrap().token;

        for value in [
            "Token abc".to_string(),
            format!("bearer {token}"),
            format!("Bearer{token}"),
            token.clone(),
        ] {
            assert_eq!(
                authenticate(&headers(Some(&value)), &codec),
                Err(AuthError::MalformedCredential),
                "{value:?}"
            );
        }
    }

    #[test]
    fn empty_bearer_token_goes_through_verification() {
        let codec = codec();
        assert_eq!(
            authenticate(&headers(Some("Bearer ")), &codec),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn extra_whitespace_is_not_trimmed() {
        let codec = codec();
        let token = codec.issue(Identity::new(1)).unwrap().token;
        assert_eq!(
            authenticate(&headers(Some(&format!("Bearer  {token}"))), &codec),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn valid_bearer_token_yields_identity() {
        let codec = codec();
        let token = codec.issue(Identity::new(42)).unwrap().token;
        assert_eq!(
            authenticate(&headers(Some(&format!("Bearer {token}"))), &codec),
            Ok(Identity::new(42))
        );
    }
}
