//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::car::CarRepository;
use crate::domain::city::CityRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

use super::car_repository::SeaOrmCarRepository;
use super::city_repository::SeaOrmCityRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let car = repos.cars().get(car_id).await?;
/// let booked = repos.reservations().get_by_car_id(car_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    cars: SeaOrmCarRepository,
    users: SeaOrmUserRepository,
    cities: SeaOrmCityRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            cars: SeaOrmCarRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db.clone()),
            cities: SeaOrmCityRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn cities(&self) -> &dyn CityRepository {
        &self.cities
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
