//! SeaORM implementation of CarRepository
//!
//! Cars store a `city_id`; the domain speaks city names, so every read and
//! write goes through the cities table.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::city_repository::SeaOrmCityRepository;
use super::errors::db_err;
use crate::domain::car::{Car, CarRepository, CarStatus, CarType};
use crate::domain::city::CityRepository;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{car, city};
use crate::shared::Cursor;

pub struct SeaOrmCarRepository {
    db: DatabaseConnection,
    cities: SeaOrmCityRepository,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            cities: SeaOrmCityRepository::new(db.clone()),
            db,
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: car::Model, city_name: String) -> DomainResult<Car> {
    let car_type = CarType::parse(&m.car_type).ok_or_else(|| {
        DomainError::Storage(format!("car {} has unknown type {:?}", m.id, m.car_type))
    })?;
    let status = CarStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("car {} has unknown status {:?}", m.id, m.status))
    })?;

    Ok(Car {
        id: m.id,
        car_type,
        seats: m.seats,
        hourly_rent_cost: m.hourly_rent_cost,
        city_name,
        status,
    })
}

fn domain_to_active(c: &Car, city_id: Uuid) -> car::ActiveModel {
    car::ActiveModel {
        id: Set(c.id),
        car_type: Set(c.car_type.as_str().to_string()),
        seats: Set(c.seats),
        hourly_rent_cost: Set(c.hourly_rent_cost),
        city_id: Set(city_id),
        status: Set(c.status.as_str().to_string()),
    }
}

// ── CarRepository impl ──────────────────────────────────────────

#[async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn insert(&self, c: Car) -> DomainResult<()> {
        debug!("Inserting car: {} in {}", c.id, c.city_name);
        let city_id = self.cities.get_id_by_name(&c.city_name).await?;
        domain_to_active(&c, city_id)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Car> {
        let (model, city) = car::Entity::find_by_id(id)
            .find_also_related(city::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::CarNotFound)?;

        let city_name = city.map(|c| c.name).ok_or(DomainError::CityNotFound)?;
        model_to_domain(model, city_name)
    }

    async fn full_update(&self, c: Car) -> DomainResult<()> {
        debug!("Updating car: {}", c.id);
        let city_id = self.cities.get_id_by_name(&c.city_name).await?;
        let result = car::Entity::update_many()
            .set(domain_to_active(&c, city_id))
            .filter(car::Column::Id.eq(c.id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::CarNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting car: {}", id);
        car::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, city_name: &str, cursor: Cursor) -> DomainResult<Vec<Car>> {
        let city_id = self.cities.get_id_by_name(city_name).await?;

        let models = car::Entity::find()
            .filter(car::Column::CityId.eq(city_id))
            .filter(car::Column::Id.gt(cursor.from_id))
            .order_by_asc(car::Column::Id)
            .limit(u64::from(cursor.limit))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models
            .into_iter()
            .map(|m| model_to_domain(m, city_name.to_string()))
            .collect()
    }
}
