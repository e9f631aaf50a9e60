use async_trait::async_trait;

use super::domain::{LineStatus, User, UserId};

/// Mutation applied to a single record while the store holds its write lock.
pub type UserMutation = Box<dyn FnOnce(&mut User) + Send>;

/// Storage seam for user records.
///
/// `None` / `false` results mean "no record with that id"; the service layer
/// turns them into `ServiceError::NotFound`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All live records in insertion order.
    async fn list(&self) -> Vec<User>;
    async fn get(&self, id: UserId) -> Option<User>;
    /// Assign a fresh id and append.
    async fn insert(&self, name: String, line_status: LineStatus) -> User;
    /// Overwrite both mutable fields.
    async fn update(&self, id: UserId, name: String, line_status: LineStatus) -> Option<User>;
    /// Apply `f` to the matching record atomically.
    async fn update_with(&self, id: UserId, f: UserMutation) -> Option<User>;
    async fn delete(&self, id: UserId) -> bool;
    async fn len(&self) -> usize;
}
