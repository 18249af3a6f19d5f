/*
 * Responsibility
 * - games CRUD の口 (GameStore trait)
 * - Postgres 実装 (SQLx)。PgPool を受け取り CRUD を提供
 * - DB エラーは RepoError で返す
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GameRow {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub genre: String,
    pub price: i64,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn list(&self) -> Result<Vec<GameRow>, RepoError>;
    async fn create(&self, game: NewGame) -> Result<GameRow, RepoError>;
    async fn get(&self, id: i64) -> Result<Option<GameRow>, RepoError>;
    /// Replaces title/genre/price. `Ok(None)` when the id does not exist.
    async fn update(&self, id: i64, game: NewGame) -> Result<Option<GameRow>, RepoError>;
    /// `Ok(false)` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgGameStore {
    db: PgPool,
}

impl PgGameStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        sqlx::query(include_str!("../../migrations/0001_create_games.sql"))
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn list(&self) -> Result<Vec<GameRow>, RepoError> {
        let rows = sqlx::query_as::<_, GameRow>(
            r#"
            SELECT id, title, genre, price
            FROM games
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn create(&self, game: NewGame) -> Result<GameRow, RepoError> {
        let row = sqlx::query_as::<_, GameRow>(
            r#"
            INSERT INTO games (title, genre, price)
            VALUES ($1, $2, $3)
            RETURNING id, title, genre, price
            "#,
        )
        .bind(&game.title)
        .bind(&game.genre)
        .bind(game.price)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<GameRow>, RepoError> {
        let row = sqlx::query_as::<_, GameRow>(
            r#"
            SELECT id, title, genre, price
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, game: NewGame) -> Result<Option<GameRow>, RepoError> {
        let row = sqlx::query_as::<_, GameRow>(
            r#"
            UPDATE games
            SET title = $2, genre = $3, price = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, title, genre, price
            "#,
        )
        .bind(id)
        .bind(&game.title)
        .bind(&game.genre)
        .bind(game.price)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
