use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::users::domain::{LineStatus, User, UserId};
use crate::users::repository::{UserMutation, UserRepository};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    next_id: UserId,
}

/// Process-local user store.
///
/// Records are kept in insertion order and looked up by linear scan. Ids
/// come from a counter that only moves forward, so an id is never handed out
/// twice even after the record holding it is deleted. The counter and the
/// records share one lock.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn list(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    async fn get(&self, id: UserId) -> Option<User> {
        let inner = self.inner.read().await;
        inner.users.iter().find(|u| u.id == id).cloned()
    }

    async fn insert(&self, name: String, line_status: LineStatus) -> User {
        let mut inner = self.inner.write().await;
        let user = User { id: inner.next_id, name, line_status };
        inner.next_id += 1;
        inner.users.push(user.clone());
        user
    }

    async fn update(&self, id: UserId, name: String, line_status: LineStatus) -> Option<User> {
        self.update_with(
            id,
            Box::new(move |u: &mut User| {
                u.name = name;
                u.line_status = line_status;
            }),
        )
        .await
    }

    async fn update_with(&self, id: UserId, f: UserMutation) -> Option<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.iter_mut().find(|u| u.id == id)?;
        f(user);
        // a mutation must not move the record to another id
        user.id = id;
        Some(user.clone())
    }

    async fn delete(&self, id: UserId) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        inner.users.len() != before
    }

    async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }
}
