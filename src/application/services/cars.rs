//! Car management service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{Car, DomainResult, RepositoryProvider};
use crate::shared::{Cursor, CursorPage};

pub const DEFAULT_CARS_PER_PAGE: u16 = 20;

pub struct CarService {
    repos: Arc<dyn RepositoryProvider>,
    page_size: u16,
}

impl CarService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            page_size: DEFAULT_CARS_PER_PAGE,
        }
    }

    pub fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Store a new car under a freshly generated id.
    pub async fn register(&self, mut car: Car) -> DomainResult<Car> {
        car.id = Uuid::new_v4();
        self.repos.cars().insert(car.clone()).await?;
        info!(car_id = %car.id, city = %car.city_name, "Car registered");
        Ok(car)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Car> {
        self.repos.cars().get(id).await
    }

    pub async fn full_update(&self, car: Car) -> DomainResult<()> {
        let id = car.id;
        self.repos.cars().full_update(car).await?;
        info!(car_id = %id, "Car updated");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.repos.cars().delete(id).await?;
        info!(car_id = %id, "Car deleted");
        Ok(())
    }

    pub async fn list(&self, city_name: &str, from_car_id: Option<Uuid>) -> DomainResult<CursorPage<Car>> {
        let cursor = Cursor::new(from_car_id, self.page_size);
        let cars = self.repos.cars().list(city_name, cursor).await?;
        Ok(CursorPage::new(cars, cursor.limit, |c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarStatus, CarType, DomainError};
    use crate::infrastructure::InMemoryStorage;

    fn draft(city: &str) -> Car {
        Car {
            id: Uuid::nil(),
            car_type: CarType::Limousine,
            seats: 8,
            hourly_rent_cost: 200.0,
            city_name: city.to_string(),
            status: CarStatus::Available,
        }
    }

    #[tokio::test]
    async fn register_assigns_id() {
        let svc = CarService::new(Arc::new(InMemoryStorage::new()));
        let car = svc.register(draft("Chicago")).await.unwrap();
        assert!(!car.id.is_nil());
        assert_eq!(svc.get(car.id).await.unwrap(), car);
    }

    #[tokio::test]
    async fn list_pages_through_city() {
        let svc = CarService::new(Arc::new(InMemoryStorage::new())).with_page_size(2);
        for _ in 0..3 {
            svc.register(draft("Miami")).await.unwrap();
        }
        svc.register(draft("Chicago")).await.unwrap();

        let first = svc.list("Miami", None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let next = first.next_from_id.expect("full page has a cursor");

        let second = svc.list("Miami", Some(next)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_from_id.is_none());
        assert!(second.items[0].id > next);
    }

    #[tokio::test]
    async fn unknown_city_is_invalid() {
        let svc = CarService::new(Arc::new(InMemoryStorage::new()));
        assert_eq!(
            svc.register(draft("Atlantis")).await,
            Err(DomainError::InvalidCityName)
        );
    }
}
