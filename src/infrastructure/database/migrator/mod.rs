//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_cities;
mod m20240101_000002_create_users;
mod m20240101_000003_create_cars;
mod m20240101_000004_create_reservations;
mod m20240101_000005_add_reservation_exclusion;

pub use m20240101_000001_create_cities::SEED_CITIES;
pub use m20240101_000004_create_reservations::{FK_RESERVATIONS_CAR, FK_RESERVATIONS_USER};
pub use m20240101_000005_add_reservation_exclusion::RESERVATION_EXCLUSION_CONSTRAINT;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_cities::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_cars::Migration),
            Box::new(m20240101_000004_create_reservations::Migration),
            Box::new(m20240101_000005_add_reservation_exclusion::Migration),
        ]
    }
}
