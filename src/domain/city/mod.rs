//! City reference data
//!
//! Cities are seeded by migration; cars point at them by id and the API
//! addresses them by name.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: Uuid,
    pub name: String,
}

/// Upper bound on `list_names`.
pub const MAX_CITY_NAMES: u64 = 100;

#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Unknown name fails with `InvalidCityName`.
    async fn get_id_by_name(&self, name: &str) -> DomainResult<Uuid>;

    /// Unknown id fails with `CityNotFound`.
    async fn get_name_by_id(&self, id: Uuid) -> DomainResult<String>;

    /// Alphabetical, at most [`MAX_CITY_NAMES`].
    async fn list_names(&self) -> DomainResult<Vec<String>>;
}
