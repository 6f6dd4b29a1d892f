//! Car domain entity

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CarType {
    Sedan,
    Luxury,
    #[serde(rename = "Sports Car")]
    SportsCar,
    Limousine,
}

impl CarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Luxury => "Luxury",
            Self::SportsCar => "Sports Car",
            Self::Limousine => "Limousine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Sedan" => Some(Self::Sedan),
            "Luxury" => Some(Self::Luxury),
            "Sports Car" => Some(Self::SportsCar),
            "Limousine" => Some(Self::Limousine),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CarStatus {
    Available,
    Unavailable,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(Self::Available),
            "Unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// Rental car. `city_name` is resolved to a city id by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: Uuid,
    pub car_type: CarType,
    pub seats: i16,
    pub hourly_rent_cost: f64,
    pub city_name: String,
    pub status: CarStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sports_car_uses_spaced_name() {
        assert_eq!(CarType::SportsCar.as_str(), "Sports Car");
        assert_eq!(CarType::parse("Sports Car"), Some(CarType::SportsCar));
        let json = serde_json::to_string(&CarType::SportsCar).unwrap();
        assert_eq!(json, "\"Sports Car\"");
    }

    #[test]
    fn every_type_parses_back() {
        for t in [CarType::Sedan, CarType::Luxury, CarType::SportsCar, CarType::Limousine] {
            assert_eq!(CarType::parse(t.as_str()), Some(t));
        }
        assert_eq!(CarStatus::parse("Available"), Some(CarStatus::Available));
        assert_eq!(CarStatus::parse("Broken"), None);
    }
}
