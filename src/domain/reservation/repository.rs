//! Reservation repository interface (the store gateway used by booking)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::Reservation;
use crate::domain::DomainResult;
use crate::shared::Cursor;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation.
    ///
    /// Missing user or car rows surface as `UserNotFound` / `CarNotFound`.
    async fn insert(&self, reservation: Reservation) -> DomainResult<()>;

    /// Fails with `ReservationNotFound` if absent.
    async fn get(&self, id: Uuid) -> DomainResult<Reservation>;

    /// Replace every mutable field of the row matching `reservation.id`.
    async fn full_update(&self, reservation: Reservation) -> DomainResult<()>;

    /// Unconditional; deleting a missing row is not an error.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Reservations whose id is after the cursor and whose window is
    /// contained in `[start_date, end_date]`, ordered by id.
    async fn list(
        &self,
        cursor: Cursor,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;

    async fn get_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Reservation>>;

    async fn get_by_car_id(&self, car_id: Uuid) -> DomainResult<Vec<Reservation>>;

    /// Every reservation of `car_id` whose start AND end both fall within
    /// `[start_date, end_date]` (inclusive), regardless of status.
    async fn get_by_car_id_and_time_frame(
        &self,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>>;
}
