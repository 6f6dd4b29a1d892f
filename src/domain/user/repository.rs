//! User repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Duplicate email fails with `EmailAlreadyRegistered`.
    async fn insert(&self, user: User) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<User>;

    async fn full_update(&self, user: User) -> DomainResult<()>;

    /// Fails with `UserNotFound` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
