//! Domain layer: entities and repository interfaces.

pub mod car;
pub mod city;
pub mod repositories;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use car::{Car, CarRepository, CarStatus, CarType};
pub use city::{City, CityRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{PaymentStatus, Reservation, ReservationRepository, ReservationStatus};
pub use user::{User, UserRepository, UserStatus, UserType};

pub use crate::shared::errors::DomainError;
