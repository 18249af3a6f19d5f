//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Body size limits
//! - CORS policy for browser clients
//!
//! Policy:
//! - Development: permissive CORS (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config, WITHOUT credentials.
//!
//! No request timeout is applied; a request runs to completion.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::Config;

const REQUEST_ID_HEADER: &str = "x-request-id";
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Outermost layer: every request gets an `x-request-id` before anything
/// else sees it, and the same id is echoed back on the response.
pub fn apply_request_id<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header));

    router.layer(layers)
}

/// CORS + body limit. Sits inside the access log observer, so preflight
/// answers and 413 rejections are still observed.
///
/// Applied as two `layer` calls: CORS needs a `Default` response body, which
/// the limit layer's body type does not provide.
pub fn apply_guards<S>(router: Router<S>, config: &Config) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors(config))
}

fn cors(config: &Config) -> CorsLayer {
    let cors = if config.app_env.is_production() {
        // Exact match only; a wildcard entry is ignored. Empty allowlist → no CORS headers.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter(|s| s.as_str() != "*")
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() {
        let app = apply_request_id(Router::new().route("/ping", get(|| async { "pong" })));

        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn client_request_id_is_kept() {
        let app = apply_request_id(Router::new().route("/ping", get(|| async { "pong" })));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let app = apply_guards(
            Router::new().route("/echo", axum::routing::post(|body: String| async move { body })),
            &config(&[("JWT_SECRET", "x")]),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header(header::CONTENT_LENGTH, BODY_LIMIT_BYTES + 1)
                    .body(Body::from(vec![b'a'; BODY_LIMIT_BYTES + 1]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn production_cors_only_echoes_allowed_origins() {
        let app = apply_guards(
            Router::new().route("/ping", get(|| async { "pong" })),
            &config(&[
                ("JWT_SECRET", "x"),
                ("APP_ENV", "production"),
                ("CORS_ALLOWED_ORIGINS", "https://games.example"),
            ]),
        );

        let allowed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(header::ORIGIN, "https://games.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://games.example"
        );

        let denied = app
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            !denied
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
