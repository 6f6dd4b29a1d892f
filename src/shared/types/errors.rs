use thiserror::Error;

/// Errors surfaced by the domain and application layers.
///
/// Every variant is a distinguishable kind; the HTTP layer maps them to
/// status codes and never inspects the message text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("reservation time frame is invalid")]
    InvalidReservationTimeFrame,

    #[error("period is shorter than minimum allowed ({hours} hours)")]
    MinimumReservationHours { hours: u32 },

    #[error("car not available")]
    CarNotAvailable,

    #[error("user not found")]
    UserNotFound,

    #[error("car not found")]
    CarNotFound,

    #[error("reservation was not found")]
    ReservationNotFound,

    #[error("city name is not valid")]
    InvalidCityName,

    #[error("city not found")]
    CityNotFound,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("Validation: {0}")]
    Validation(String),

    /// Infrastructure failure (connection lost, query error, ...)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Short machine-friendly label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidReservationTimeFrame => "invalid_time_frame",
            Self::MinimumReservationHours { .. } => "minimum_hours",
            Self::CarNotAvailable => "car_not_available",
            Self::UserNotFound => "user_not_found",
            Self::CarNotFound => "car_not_found",
            Self::ReservationNotFound => "reservation_not_found",
            Self::InvalidCityName => "invalid_city_name",
            Self::CityNotFound => "city_not_found",
            Self::EmailAlreadyRegistered => "email_already_registered",
            Self::Validation(_) => "validation",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether this error comes from infrastructure rather than a business rule.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_hours_message_carries_threshold() {
        let err = DomainError::MinimumReservationHours { hours: 6 };
        assert_eq!(
            err.to_string(),
            "period is shorter than minimum allowed (6 hours)"
        );
    }

    #[test]
    fn only_storage_is_infrastructure() {
        assert!(DomainError::Storage("boom".into()).is_infrastructure());
        assert!(!DomainError::CarNotAvailable.is_infrastructure());
        assert!(!DomainError::ReservationNotFound.is_infrastructure());
    }
}
