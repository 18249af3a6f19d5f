/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 保護 route group 用の Bearer 検証
 * - observer: 全リクエストの access log
 * - http: request-id / body limit / CORS
 */
pub mod auth;
pub mod http;
pub mod observer;
