//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::{PaymentStatus, Reservation, ReservationStatus};

pub(crate) fn not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        let mut err = ValidationError::new("nil_uuid");
        err.message = Some("must not be the nil UUID".into());
        return Err(err);
    }
    Ok(())
}

fn default_status() -> ReservationStatus {
    ReservationStatus::Reserved
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}

/// Body of create and full-update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReservationRequest {
    #[validate(custom(function = "not_nil"))]
    pub user_id: Uuid,
    #[validate(custom(function = "not_nil"))]
    pub car_id: Uuid,
    /// Defaults to `Reserved`
    #[serde(default = "default_status")]
    pub status: ReservationStatus,
    /// Defaults to `Pending`
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,
    /// RFC 3339, e.g. `2030-05-01T10:00:00Z`
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ReservationRequest {
    /// Domain candidate; `id` is nil for new bookings.
    pub fn into_domain(self, id: Uuid) -> Reservation {
        Reservation {
            id,
            user_id: self.user_id,
            car_id: self.car_id,
            status: self.status,
            payment_status: self.payment_status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Reservation in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            car_id: r.car_id,
            status: r.status,
            payment_status: r.payment_status,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

/// Query for `GET /api/v1/reservations`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReservationsParams {
    /// Last id of the previous page; omit for the first page
    pub from_reservation_id: Option<Uuid>,
    /// Only reservations lying entirely inside `[start_date, end_date]`
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationListDto {
    pub reservations: Vec<ReservationDto>,
    /// Pass as `from_reservation_id` to fetch the next page; absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_from_reservation_id: Option<Uuid>,
}

impl ReservationListDto {
    pub fn from_reservations(items: Vec<Reservation>, next: Option<Uuid>) -> Self {
        Self {
            reservations: items.into_iter().map(ReservationDto::from).collect(),
            next_from_reservation_id: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_statuses() {
        let body = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "car_id": Uuid::new_v4(),
            "start_date": "2030-05-01T10:00:00Z",
            "end_date": "2030-05-02T10:00:00Z",
        });
        let req: ReservationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.status, ReservationStatus::Reserved);
        assert_eq!(req.payment_status, PaymentStatus::Pending);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn nil_ids_fail_validation() {
        let body = serde_json::json!({
            "user_id": Uuid::nil(),
            "car_id": Uuid::new_v4(),
            "start_date": "2030-05-01T10:00:00Z",
            "end_date": "2030-05-02T10:00:00Z",
        });
        let req: ReservationRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_id"));
    }

    #[test]
    fn unknown_status_is_rejected_by_serde() {
        let body = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "car_id": Uuid::new_v4(),
            "status": "Pending",
            "start_date": "2030-05-01T10:00:00Z",
            "end_date": "2030-05-02T10:00:00Z",
        });
        assert!(serde_json::from_value::<ReservationRequest>(body).is_err());
    }
}
