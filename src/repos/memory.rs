//! Process-local game store. Used when no `DATABASE_URL` is configured and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::RepoError;
use crate::repos::game_repo::{GameRow, GameStore, NewGame};

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    games: BTreeMap<i64, GameRow>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn list(&self) -> Result<Vec<GameRow>, RepoError> {
        Ok(self.inner.read().await.games.values().cloned().collect())
    }

    async fn create(&self, game: NewGame) -> Result<GameRow, RepoError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let row = GameRow {
            id: inner.next_id,
            title: game.title,
            genre: game.genre,
            price: game.price,
        };
        inner.games.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<GameRow>, RepoError> {
        Ok(self.inner.read().await.games.get(&id).cloned())
    }

    async fn update(&self, id: i64, game: NewGame) -> Result<Option<GameRow>, RepoError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.games.get_mut(&id) else {
            return Ok(None);
        };

        row.title = game.title;
        row.genre = game.genre;
        row.price = game.price;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.inner.write().await.games.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witcher() -> NewGame {
        NewGame {
            title: "The Witcher 3".into(),
            genre: "RPG".into(),
            price: 50,
        }
    }

    #[tokio::test]
    async fn crud_lifecycle() {
        let store = InMemoryGameStore::new();

        let created = store.create(witcher()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.get(1).await.unwrap(), Some(created.clone()));

        let updated = store
            .update(
                1,
                NewGame {
                    price: 30,
                    ..witcher()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, 30);

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert_eq!(store.get(1).await.unwrap(), None);
        assert!(store.update(1, witcher()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryGameStore::new();
        let first = store.create(witcher()).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(witcher()).await.unwrap();
        assert_eq!(second.id, first.id + 1);
        assert_eq!(store.list().await.unwrap(), vec![second]);
    }
}
