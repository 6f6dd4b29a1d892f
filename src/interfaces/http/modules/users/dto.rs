//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{User, UserStatus, UserType};

fn default_user_type() -> UserType {
    UserType::Customer
}

fn default_user_status() -> UserStatus {
    UserStatus::Active
}

/// Body of sign-up and full-update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "first_name": "Ada",
    "last_name": "Lovelace",
    "email": "ada@example.com",
    "type": "Customer"
}))]
pub struct UserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Unique across users
    #[validate(email)]
    pub email: String,
    /// `Customer` (default) or `Admin`
    #[serde(rename = "type", default = "default_user_type")]
    pub user_type: UserType,
    #[serde(default = "default_user_status")]
    pub status: UserStatus,
}

impl UserRequest {
    pub fn into_domain(self, id: Uuid) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            user_type: self.user_type,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub status: UserStatus,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            user_type: u.user_type,
            status: u.status,
        }
    }
}
