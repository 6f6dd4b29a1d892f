//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReservationStatus {
    /// Car is held for the user
    Reserved,
    /// Reservation was cancelled
    Canceled,
    /// Rental finished
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "Reserved",
            Self::Canceled => "Canceled",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Reserved" => Some(Self::Reserved),
            "Canceled" => Some(Self::Canceled),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment bookkeeping status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Canceled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Canceled => "Canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Paid" => Some(Self::Paid),
            "Pending" => Some(Self::Pending),
            "Canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Car reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Assigned by the booking engine; nil until booked
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Reservation {
    /// Candidate for booking, without an id yet.
    pub fn candidate(
        user_id: Uuid,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            user_id,
            car_id,
            status: ReservationStatus::Reserved,
            payment_status: PaymentStatus::Pending,
            start_date,
            end_date,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    pub fn is_reserved(&self) -> bool {
        self.status == ReservationStatus::Reserved
    }

    /// True when both endpoints fall inside `[start, end]`.
    pub fn is_contained_in(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date >= start
            && self.start_date <= end
            && self.end_date >= start
            && self.end_date <= end
    }

    /// Half-open interval intersection with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date < end && self.end_date > start
    }
}

/// Checks whether `[start, end]` is a well-formed window (strictly increasing).
pub fn is_valid_time_frame(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start < end
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 1, hour, 0, 0).unwrap()
    }

    fn sample(start: u32, end: u32) -> Reservation {
        Reservation::candidate(Uuid::new_v4(), Uuid::new_v4(), at(start), at(end))
    }

    #[test]
    fn candidate_has_nil_id_and_defaults() {
        let r = sample(1, 8);
        assert!(r.id.is_nil());
        assert!(r.is_reserved());
        assert_eq!(r.payment_status, PaymentStatus::Pending);
        assert_eq!(r.duration(), Duration::hours(7));
    }

    #[test]
    fn time_frame_must_be_strictly_increasing() {
        assert!(is_valid_time_frame(at(1), at(2)));
        assert!(!is_valid_time_frame(at(2), at(2)));
        assert!(!is_valid_time_frame(at(3), at(2)));
    }

    #[test]
    fn containment_is_inclusive_on_both_ends() {
        let r = sample(2, 4);
        assert!(r.is_contained_in(at(2), at(4)));
        assert!(r.is_contained_in(at(1), at(5)));
        assert!(!r.is_contained_in(at(3), at(5)));
        assert!(!r.is_contained_in(at(1), at(3)));
    }

    #[test]
    fn partial_overlap_is_not_containment() {
        // starts before the window and ends inside it
        let r = sample(1, 3);
        assert!(!r.is_contained_in(at(2), at(6)));
        assert!(r.overlaps(at(2), at(6)));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let r = sample(1, 3);
        assert!(!r.overlaps(at(3), at(5)));
    }

    #[test]
    fn unknown_status_strings_are_rejected() {
        assert_eq!(ReservationStatus::parse("Reserved"), Some(ReservationStatus::Reserved));
        assert_eq!(ReservationStatus::parse("reserved"), None);
        assert_eq!(PaymentStatus::parse("Paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse("Refunded"), None);
    }
}
