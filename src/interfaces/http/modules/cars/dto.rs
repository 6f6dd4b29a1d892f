//! Car DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Car, CarStatus, CarType};

fn default_car_status() -> CarStatus {
    CarStatus::Available
}

/// Body of register and full-update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "type": "Sports Car",
    "seats": 2,
    "hourly_rent_cost": 95.5,
    "city_name": "Miami",
    "status": "Available"
}))]
pub struct CarRequest {
    /// `Sedan`, `Luxury`, `Sports Car` or `Limousine`
    #[serde(rename = "type")]
    pub car_type: CarType,
    #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
    pub seats: i16,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than 0"))]
    pub hourly_rent_cost: f64,
    /// Must name a seeded city
    #[validate(length(min = 1, message = "must not be empty"))]
    pub city_name: String,
    #[serde(default = "default_car_status")]
    pub status: CarStatus,
}

impl CarRequest {
    pub fn into_domain(self, id: Uuid) -> Car {
        Car {
            id,
            car_type: self.car_type,
            seats: self.seats,
            hourly_rent_cost: self.hourly_rent_cost,
            city_name: self.city_name,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub car_type: CarType,
    pub seats: i16,
    pub hourly_rent_cost: f64,
    pub city_name: String,
    pub status: CarStatus,
}

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            id: c.id,
            car_type: c.car_type,
            seats: c.seats,
            hourly_rent_cost: c.hourly_rent_cost,
            city_name: c.city_name,
            status: c.status,
        }
    }
}

/// Query for `GET /api/v1/cars`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCarsParams {
    /// City to list cars in
    pub city: String,
    /// Last id of the previous page; omit for the first page
    pub from_car_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarListDto {
    pub cars: Vec<CarDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_from_car_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(seats: i16, cost: f64, city: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "Sports Car",
            "seats": seats,
            "hourly_rent_cost": cost,
            "city_name": city,
        })
    }

    #[test]
    fn type_field_and_default_status() {
        let req: CarRequest = serde_json::from_value(body(2, 95.5, "Miami")).unwrap();
        assert_eq!(req.car_type, CarType::SportsCar);
        assert_eq!(req.status, CarStatus::Available);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn seats_and_cost_bounds() {
        let req: CarRequest = serde_json::from_value(body(0, 95.5, "Miami")).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("seats"));

        let req: CarRequest = serde_json::from_value(body(4, 0.0, "Miami")).unwrap();
        assert!(req
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("hourly_rent_cost"));

        let req: CarRequest = serde_json::from_value(body(4, 10.0, "")).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("city_name"));
    }

    #[test]
    fn dto_serializes_type_key() {
        let dto = CarDto::from(
            serde_json::from_value::<CarRequest>(body(2, 95.5, "Miami"))
                .unwrap()
                .into_domain(Uuid::new_v4()),
        );
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "Sports Car");
        assert!(json.get("car_type").is_none());
    }
}
