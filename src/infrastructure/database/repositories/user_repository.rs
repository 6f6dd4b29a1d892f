//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::errors::{db_err, violation, Violation};
use crate::domain::user::{User, UserRepository, UserStatus, UserType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> DomainResult<User> {
    let user_type = UserType::parse(&m.user_type).ok_or_else(|| {
        DomainError::Storage(format!("user {} has unknown type {:?}", m.id, m.user_type))
    })?;
    let status = UserStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("user {} has unknown status {:?}", m.id, m.status))
    })?;

    Ok(User {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        user_type,
        status,
    })
}

fn domain_to_active(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        first_name: Set(u.first_name),
        last_name: Set(u.last_name),
        email: Set(u.email),
        user_type: Set(u.user_type.as_str().to_string()),
        status: Set(u.status.as_str().to_string()),
    }
}

fn write_err(e: sea_orm::DbErr) -> DomainError {
    match violation(&e) {
        Some(Violation::Unique) => DomainError::EmailAlreadyRegistered,
        _ => db_err(e),
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, u: User) -> DomainResult<()> {
        debug!("Inserting user: {}", u.id);
        domain_to_active(u)
            .insert(&self.db)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::UserNotFound)?;
        model_to_domain(model)
    }

    async fn full_update(&self, u: User) -> DomainResult<()> {
        debug!("Updating user: {}", u.id);
        let result = user::Entity::update_many()
            .set(domain_to_active(u.clone()))
            .filter(user::Column::Id.eq(u.id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::UserNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting user: {}", id);
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::UserNotFound);
        }
        Ok(())
    }
}
