//! Mapping of domain errors to HTTP responses

use axum::http::StatusCode;
use axum::Json;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler's return type.
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

/// Default status for a domain error.
///
/// Reservation endpoints answer 400 for a missing user or car instead of
/// 404, since those ids come from the request body; they remap the status
/// themselves.
pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidReservationTimeFrame
        | DomainError::MinimumReservationHours { .. }
        | DomainError::CarNotAvailable
        | DomainError::InvalidCityName
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::UserNotFound
        | DomainError::CarNotFound
        | DomainError::ReservationNotFound
        | DomainError::CityNotFound => StatusCode::NOT_FOUND,
        DomainError::EmailAlreadyRegistered => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the error response for `e` with the given status.
///
/// Infrastructure detail is logged, never returned to the client.
pub fn error_response<T>(status: StatusCode, e: DomainError) -> ApiError<T> {
    let message = if e.is_infrastructure() {
        tracing::error!(error = %e, "Request failed");
        "internal server error".to_string()
    } else {
        e.to_string()
    };
    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_are_client_errors() {
        assert_eq!(
            status_for(&DomainError::MinimumReservationHours { hours: 6 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&DomainError::CarNotAvailable), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DomainError::ReservationNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&DomainError::EmailAlreadyRegistered), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_detail_is_hidden() {
        let (status, Json(body)) = error_response::<()>(
            StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Storage("password authentication failed for user rent".into()),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("internal server error"));
        assert!(!body.success);
    }
}
