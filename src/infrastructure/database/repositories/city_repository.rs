//! SeaORM implementation of CityRepository

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::errors::db_err;
use crate::domain::city::{CityRepository, MAX_CITY_NAMES};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::city;

pub struct SeaOrmCityRepository {
    db: DatabaseConnection,
}

impl SeaOrmCityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CityRepository for SeaOrmCityRepository {
    async fn get_id_by_name(&self, name: &str) -> DomainResult<Uuid> {
        city::Entity::find()
            .filter(city::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|c| c.id)
            .ok_or(DomainError::InvalidCityName)
    }

    async fn get_name_by_id(&self, id: Uuid) -> DomainResult<String> {
        city::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|c| c.name)
            .ok_or(DomainError::CityNotFound)
    }

    async fn list_names(&self) -> DomainResult<Vec<String>> {
        let models = city::Entity::find()
            .order_by_asc(city::Column::Name)
            .limit(MAX_CITY_NAMES)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(|c| c.name).collect())
    }
}
