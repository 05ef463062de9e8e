//! In-memory user storage.

use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::User;

/// Users kept in insertion order behind an async lock.
///
/// Reads share the lock; writes take it exclusively for the length of one
/// operation, so concurrent requests never observe a half-applied change.
#[derive(Debug, Default)]
pub struct UsersRepository {
    users: RwLock<Vec<User>>,
}

impl UsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn find_one(&self, id: Uuid) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn insert(&self, user: User) -> User {
        self.users.write().await.push(user.clone());
        user
    }

    /// Replaces the user with the same id. Returns `None` if there is none.
    pub async fn replace(&self, user: User) -> Option<User> {
        let mut users = self.users.write().await;
        let slot = users.iter_mut().find(|u| u.id == user.id)?;
        *slot = user.clone();
        Some(user)
    }

    /// Removes the user with `id`. Returns whether one was removed.
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}
