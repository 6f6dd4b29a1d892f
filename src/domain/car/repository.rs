//! Car repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Car;
use crate::domain::DomainResult;
use crate::shared::Cursor;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Unknown `city_name` fails with `InvalidCityName`.
    async fn insert(&self, car: Car) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Car>;

    /// Fails with `CarNotFound` when no row matched.
    async fn full_update(&self, car: Car) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Cars in a city, ordered by id, starting after the cursor.
    async fn list(&self, city_name: &str, cursor: Cursor) -> DomainResult<Vec<Car>>;
}
