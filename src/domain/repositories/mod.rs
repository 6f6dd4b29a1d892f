//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::car::CarRepository;
use super::city::CityRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let car = repos.cars().get(car_id).await?;
///     let booked = repos.reservations().get_by_car_id(car.id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn cars(&self) -> &dyn CarRepository;
    fn users(&self) -> &dyn UserRepository;
    fn cities(&self) -> &dyn CityRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
