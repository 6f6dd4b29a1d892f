//! User management service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainResult, RepositoryProvider, User};

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Register a user under a freshly generated id.
    pub async fn sign_up(&self, mut user: User) -> DomainResult<User> {
        user.id = Uuid::new_v4();
        self.repos.users().insert(user.clone()).await?;
        info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.repos.users().get(id).await
    }

    pub async fn full_update(&self, user: User) -> DomainResult<()> {
        let id = user.id;
        self.repos.users().full_update(user).await?;
        info!(user_id = %id, "User updated");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.repos.users().delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, UserStatus, UserType};
    use crate::infrastructure::InMemoryStorage;

    fn draft(email: &str) -> User {
        User {
            id: Uuid::nil(),
            first_name: "Alan".into(),
            last_name: "Turing".into(),
            email: email.into(),
            user_type: UserType::Admin,
            status: UserStatus::Active,
        }
    }

    #[tokio::test]
    async fn sign_up_then_duplicate_email() {
        let svc = UserService::new(Arc::new(InMemoryStorage::new()));
        let user = svc.sign_up(draft("alan@example.com")).await.unwrap();
        assert!(!user.id.is_nil());
        assert_eq!(
            svc.sign_up(draft("alan@example.com")).await,
            Err(DomainError::EmailAlreadyRegistered)
        );
    }

    #[tokio::test]
    async fn update_and_delete_missing_user() {
        let svc = UserService::new(Arc::new(InMemoryStorage::new()));
        let mut ghost = draft("ghost@example.com");
        ghost.id = Uuid::new_v4();
        assert_eq!(svc.full_update(ghost.clone()).await, Err(DomainError::UserNotFound));
        assert_eq!(svc.delete(ghost.id).await, Err(DomainError::UserNotFound));
    }
}
