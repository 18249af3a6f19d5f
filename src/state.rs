/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - games: GameStore, tokens: TokenCodec, login: Authenticator, access_log: sink
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::GameStore;
use crate::services::access_log::AccessLogSink;
use crate::services::auth::{Authenticator, TokenCodec};

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<dyn GameStore>,
    pub tokens: Arc<TokenCodec>,
    pub login: Arc<dyn Authenticator>,
    pub access_log: Arc<dyn AccessLogSink>,
}

impl AppState {
    pub fn new(
        games: Arc<dyn GameStore>,
        tokens: Arc<TokenCodec>,
        login: Arc<dyn Authenticator>,
        access_log: Arc<dyn AccessLogSink>,
    ) -> Self {
        Self {
            games,
            tokens,
            login,
            access_log,
        }
    }
}
