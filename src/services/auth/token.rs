//! Bearer token issuance and verification (HMAC-signed JWT).
//!
//! Tokens are self-contained: validity is derived from the signature and the
//! `exp` claim alone. There is no server-side store, so a token cannot be
//! revoked before it expires and the secret cannot be rotated without
//! invalidating every outstanding token.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::services::auth::clock::{Clock, SystemClock};
use crate::services::auth::identity::Identity;

/// Algorithms accepted on verification. Anything outside the HMAC family
/// (`none`, RS*, ES*, EdDSA, ...) is rejected before the signature is checked.
const ALLOWED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

pub const DEFAULT_TTL_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token ttl is out of range: {0}s")]
    InvalidTtl(u64),

    #[error("failed to sign token: {0}")]
    Issuance(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("token expired at {expires_at}")]
    Expired { expires_at: i64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    #[serde(default)]
    iat: Option<i64>,
    exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub subject: Identity,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or(TokenError::InvalidTtl(ttl_seconds))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ALLOWED_ALGORITHMS.to_vec();
        // Expiry is checked against our own clock in `verify`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a token for `subject`, valid for the configured ttl from now.
    pub fn issue(&self, subject: Identity) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl;

        let claims = Claims {
            sub: subject.get(),
            iat: Some(issued_at.timestamp()),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                error!(error = %e, "failed to sign token");
                TokenError::Issuance(e)
            })?;

        Ok(IssuedToken {
            token,
            subject,
            issued_at,
            expires_at,
        })
    }

    /// Verify signature, algorithm and expiry, returning the token subject.
    ///
    /// A token is valid only strictly before its `exp` instant; no leeway.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        let now = self.clock.now().timestamp();
        if now >= data.claims.exp {
            debug!(sub = data.claims.sub, exp = data.claims.exp, now, "token expired");
            return Err(TokenError::Expired {
                expires_at: data.claims.exp,
            });
        }

        Ok(Identity::new(data.claims.sub))
    }
}
