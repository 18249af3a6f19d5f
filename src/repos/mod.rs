/*
 * Responsibility
 * - games の保存先を GameStore trait の裏に隠す
 * - memory: プロセス内 (default) / game_repo: Postgres (DATABASE_URL 指定時)
 */
pub mod error;
pub mod game_repo;
pub mod memory;

pub use game_repo::{GameRow, GameStore, NewGame, PgGameStore};
pub use memory::InMemoryGameStore;
