/*
 * Responsibility
 * - /games, /protected/games/{id} の CRUD handler
 * - Path/Json を受け、DTO validation → GameStore 呼び出し
 * - protected 側は CurrentUser で認証済み主体を受け取り、ログに残す
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    api::{
        dto::games::{GameRequest, GameResponse, MessageResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    state::AppState,
};

const GAME: &str = "Game";

fn game_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request("Invalid ID format"))
}

fn game_body(payload: Result<Json<GameRequest>, JsonRejection>) -> Result<GameRequest, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    req.validate().map_err(AppError::bad_request)?;
    Ok(req)
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<GameResponse>>, AppError> {
    let rows = state.games.list().await?;
    Ok(Json(rows.into_iter().map(GameResponse::from).collect()))
}

pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<GameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let req = game_body(payload)?;
    let row = state.games.create(req.into_new_game()).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_game(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<GameResponse>, AppError> {
    let id = game_id(path)?;
    tracing::debug!(user_id = %ctx.user_id, game_id = id, "get game");

    let row = state
        .games
        .get(id)
        .await?
        .ok_or(AppError::not_found(GAME))?;

    Ok(Json(row.into()))
}

pub async fn update_game(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<GameRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, AppError> {
    let id = game_id(path)?;
    let req = game_body(payload)?;
    tracing::info!(user_id = %ctx.user_id, game_id = id, "update game");

    let row = state
        .games
        .update(id, req.into_new_game())
        .await?
        .ok_or(AppError::not_found(GAME))?;

    Ok(Json(row.into()))
}

pub async fn delete_game(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = game_id(path)?;
    tracing::info!(user_id = %ctx.user_id, game_id = id, "delete game");

    if !state.games.delete(id).await? {
        return Err(AppError::not_found(GAME));
    }

    Ok(Json(MessageResponse {
        message: "Game deleted",
    }))
}
