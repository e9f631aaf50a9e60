use std::sync::Arc;

use tracing::debug;

use super::domain::{User, UserId, UserInput};
use super::repository::UserRepository;
use crate::errors::ServiceError;
use crate::storage::InMemoryUserStore;

/// CRUD operations over user presence records.
///
/// Validation happens here, before the repository is touched, so a rejected
/// request never changes the store.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Service backed by a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserStore::new()))
    }

    pub async fn list(&self) -> Vec<User> {
        self.repo.list().await
    }

    pub async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        self.repo.get(id).await.ok_or_else(|| ServiceError::not_found("User"))
    }

    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let new = input.into_new_user()?;
        let user = self.repo.insert(new.name, new.line_status).await;
        debug!(user_id = user.id, line_status = %user.line_status, "user inserted");
        Ok(user)
    }

    /// Fields missing from `input` keep their current value.
    pub async fn update(&self, id: UserId, input: UserInput) -> Result<User, ServiceError> {
        let patch = input.into_patch()?;
        let user = match (patch.name.clone(), patch.line_status) {
            (Some(name), Some(status)) => self.repo.update(id, name, status).await,
            _ => self.repo.update_with(id, Box::new(move |u: &mut User| patch.apply(u))).await,
        };
        user.ok_or_else(|| ServiceError::not_found("User"))
    }

    pub async fn toggle(&self, id: UserId) -> Result<User, ServiceError> {
        self.repo
            .update_with(id, Box::new(|u: &mut User| u.line_status = u.line_status.toggled()))
            .await
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    pub async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        if self.repo.delete(id).await {
            debug!(user_id = id, "user removed");
            Ok(())
        } else {
            Err(ServiceError::not_found("User"))
        }
    }

    pub async fn count(&self) -> usize {
        self.repo.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::LineStatus;

    fn input(name: &str, status: &str) -> UserInput {
        UserInput { name: Some(name.into()), line_status: Some(status.into()) }
    }

    #[tokio::test]
    async fn create_adds_exactly_one_record() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        let before = svc.list().await.len();
        let created = svc.create(input("alice", "offline")).await?;
        assert_eq!(created, User { id: 0, name: "alice".into(), line_status: LineStatus::Offline });
        assert_eq!(svc.list().await.len(), before + 1);
        assert_eq!(svc.get(created.id).await?, created);
        Ok(())
    }

    #[tokio::test]
    async fn create_without_name_leaves_store_unchanged() {
        let svc = UserService::in_memory();
        let res = svc
            .create(UserInput { name: None, line_status: Some("online".into()) })
            .await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(svc.count().await, 0);
    }

    #[tokio::test]
    async fn get_after_delete_is_not_found() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        let u = svc.create(input("bob", "online")).await?;
        svc.delete(u.id).await?;
        assert!(matches!(svc.get(u.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(u.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_store_unchanged() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        let u = svc.create(input("carol", "offline")).await?;
        let res = svc.update(7, input("x", "online")).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list().await, vec![u]);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_and_patches() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        let u = svc.create(input("alice", "offline")).await?;

        let full = svc.update(u.id, input("alice", "online")).await?;
        assert_eq!(full, User { id: 0, name: "alice".into(), line_status: LineStatus::Online });

        let renamed = svc
            .update(u.id, UserInput { name: Some("alicia".into()), line_status: None })
            .await?;
        assert_eq!(renamed.name, "alicia");
        assert_eq!(renamed.line_status, LineStatus::Online);

        let bad = svc.update(u.id, input("alicia", "busy")).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        assert_eq!(svc.get(u.id).await?, renamed);
        Ok(())
    }

    #[tokio::test]
    async fn toggling_twice_restores_status() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        let u = svc.create(input("dave", "offline")).await?;
        let once = svc.toggle(u.id).await?;
        assert_eq!(once.line_status, LineStatus::Online);
        let twice = svc.toggle(u.id).await?;
        assert_eq!(twice, u);
        assert!(matches!(svc.toggle(99).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_all_leaves_list_empty() -> Result<(), anyhow::Error> {
        let svc = UserService::in_memory();
        for name in ["a", "b", "c"] {
            svc.create(input(name, "online")).await?;
        }
        for u in svc.list().await {
            svc.delete(u.id).await?;
        }
        assert!(svc.list().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn services_do_not_share_state() -> Result<(), anyhow::Error> {
        let a = UserService::in_memory();
        let b = UserService::in_memory();
        a.create(input("only-in-a", "online")).await?;
        assert_eq!(a.count().await, 1);
        assert_eq!(b.count().await, 0);
        Ok(())
    }
}
