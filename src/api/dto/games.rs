/*
 * Responsibility
 * - Games の request/response DTO
 * - validate() は形式チェックのみ (価格やジャンルの業務ルールは持たない)
 */
use serde::{Deserialize, Serialize};

use crate::repos::{GameRow, NewGame};

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub title: String,
    pub genre: String,
    pub price: i64,
}

impl GameRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        Ok(())
    }

    pub fn into_new_game(self) -> NewGame {
        NewGame {
            title: self.title,
            genre: self.genre,
            price: self.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub price: i64,
}

impl From<GameRow> for GameResponse {
    fn from(row: GameRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            genre: row.genre,
            price: row.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
