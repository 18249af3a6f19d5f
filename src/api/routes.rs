/*
 * Responsibility
 * - URL 構造を定義
 * - /health, /games, /login は認証なし
 * - /protected 配下にだけ Bearer 認証を route_layer で掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    games::{create_game, delete_game, get_game, list_games, update_game},
    health::health,
    login::login,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route(
        "/games/{id}",
        get(get_game).put(update_game).delete(delete_game),
    );
    let protected = middleware::auth::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/games", get(list_games).post(create_game))
        .route("/login", post(login))
        .nest("/protected", protected)
}
