//! In-memory storage implementation
//!
//! Mirrors the relational store closely enough for tests and local runs:
//! city names are checked against seeded reference data, emails are unique,
//! reservations must point at existing users and cars, and deleting a user
//! or car removes its reservations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::car::CarRepository;
use crate::domain::city::{CityRepository, MAX_CITY_NAMES};
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;
use crate::domain::{Car, DomainError, DomainResult, RepositoryProvider, Reservation, User};
use crate::shared::Cursor;

#[derive(Default)]
struct Tables {
    /// city name -> id
    cities: DashMap<String, Uuid>,
    cars: DashMap<Uuid, Car>,
    users: DashMap<Uuid, User>,
    /// email -> user id
    emails: DashMap<String, Uuid>,
    reservations: DashMap<Uuid, Reservation>,
}

impl Tables {
    fn drop_reservations_where(&self, f: impl Fn(&Reservation) -> bool) {
        self.reservations.retain(|_, r| !f(r));
    }
}

/// In-memory storage for development and testing
pub struct InMemoryStorage {
    cars: MemoryCars,
    users: MemoryUsers,
    cities: MemoryCities,
    reservations: MemoryReservations,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_cities(crate::infrastructure::database::migrator::SEED_CITIES)
    }

    pub fn with_cities(names: &[&str]) -> Self {
        let tables = Arc::new(Tables::default());
        for name in names {
            tables.cities.insert((*name).to_string(), Uuid::new_v4());
        }

        Self {
            cars: MemoryCars(tables.clone()),
            users: MemoryUsers(tables.clone()),
            cities: MemoryCities(tables.clone()),
            reservations: MemoryReservations(tables),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn cities(&self) -> &dyn CityRepository {
        &self.cities
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}

// ── Cities ──────────────────────────────────────────────────────

struct MemoryCities(Arc<Tables>);

#[async_trait]
impl CityRepository for MemoryCities {
    async fn get_id_by_name(&self, name: &str) -> DomainResult<Uuid> {
        self.0
            .cities
            .get(name)
            .map(|id| *id)
            .ok_or(DomainError::InvalidCityName)
    }

    async fn get_name_by_id(&self, id: Uuid) -> DomainResult<String> {
        self.0
            .cities
            .iter()
            .find(|e| *e.value() == id)
            .map(|e| e.key().clone())
            .ok_or(DomainError::CityNotFound)
    }

    async fn list_names(&self) -> DomainResult<Vec<String>> {
        let mut names: Vec<String> = self.0.cities.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names.truncate(MAX_CITY_NAMES as usize);
        Ok(names)
    }
}

// ── Cars ────────────────────────────────────────────────────────

struct MemoryCars(Arc<Tables>);

impl MemoryCars {
    fn check_city(&self, name: &str) -> DomainResult<()> {
        if self.0.cities.contains_key(name) {
            Ok(())
        } else {
            Err(DomainError::InvalidCityName)
        }
    }
}

#[async_trait]
impl CarRepository for MemoryCars {
    async fn insert(&self, car: Car) -> DomainResult<()> {
        self.check_city(&car.city_name)?;
        match self.0.cars.entry(car.id) {
            Entry::Occupied(_) => Err(DomainError::Storage(format!(
                "car {} already exists",
                car.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(car);
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> DomainResult<Car> {
        self.0
            .cars
            .get(&id)
            .map(|c| c.clone())
            .ok_or(DomainError::CarNotFound)
    }

    async fn full_update(&self, car: Car) -> DomainResult<()> {
        self.check_city(&car.city_name)?;
        match self.0.cars.get_mut(&car.id) {
            Some(mut existing) => {
                *existing = car;
                Ok(())
            }
            None => Err(DomainError::CarNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.0.cars.remove(&id);
        self.0.drop_reservations_where(|r| r.car_id == id);
        Ok(())
    }

    async fn list(&self, city_name: &str, cursor: Cursor) -> DomainResult<Vec<Car>> {
        self.check_city(city_name)?;
        let mut cars: Vec<Car> = self
            .0
            .cars
            .iter()
            .filter(|c| c.city_name == city_name && c.id > cursor.from_id)
            .map(|c| c.clone())
            .collect();
        cars.sort_by_key(|c| c.id);
        cars.truncate(cursor.limit as usize);
        Ok(cars)
    }
}

// ── Users ───────────────────────────────────────────────────────

struct MemoryUsers(Arc<Tables>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, user: User) -> DomainResult<()> {
        match self.0.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::EmailAlreadyRegistered),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.0.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.0
            .users
            .get(&id)
            .map(|u| u.clone())
            .ok_or(DomainError::UserNotFound)
    }

    async fn full_update(&self, user: User) -> DomainResult<()> {
        let Some(mut existing) = self.0.users.get_mut(&user.id) else {
            return Err(DomainError::UserNotFound);
        };

        if existing.email != user.email {
            match self.0.emails.entry(user.email.clone()) {
                Entry::Occupied(_) => return Err(DomainError::EmailAlreadyRegistered),
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.0.emails.remove(&existing.email);
        }

        *existing = user;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let (_, user) = self.0.users.remove(&id).ok_or(DomainError::UserNotFound)?;
        self.0.emails.remove(&user.email);
        self.0.drop_reservations_where(|r| r.user_id == id);
        Ok(())
    }
}

// ── Reservations ────────────────────────────────────────────────

struct MemoryReservations(Arc<Tables>);

impl MemoryReservations {
    fn check_references(&self, r: &Reservation) -> DomainResult<()> {
        if !self.0.users.contains_key(&r.user_id) {
            return Err(DomainError::UserNotFound);
        }
        if !self.0.cars.contains_key(&r.car_id) {
            return Err(DomainError::CarNotFound);
        }
        Ok(())
    }

    fn collect(&self, f: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut out: Vec<Reservation> = self
            .0
            .reservations
            .iter()
            .filter(|r| f(r.value()))
            .map(|r| r.clone())
            .collect();
        out.sort_by_key(|r| (r.start_date, r.id));
        out
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservations {
    async fn insert(&self, reservation: Reservation) -> DomainResult<()> {
        self.check_references(&reservation)?;
        match self.0.reservations.entry(reservation.id) {
            Entry::Occupied(_) => Err(DomainError::Storage(format!(
                "reservation {} already exists",
                reservation.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(reservation);
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> DomainResult<Reservation> {
        self.0
            .reservations
            .get(&id)
            .map(|r| r.clone())
            .ok_or(DomainError::ReservationNotFound)
    }

    async fn full_update(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.0.reservations.contains_key(&reservation.id) {
            return Err(DomainError::ReservationNotFound);
        }
        self.check_references(&reservation)?;
        match self.0.reservations.get_mut(&reservation.id) {
            Some(mut existing) => {
                *existing = reservation;
                Ok(())
            }
            None => Err(DomainError::ReservationNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.0.reservations.remove(&id);
        Ok(())
    }

    async fn list(
        &self,
        cursor: Cursor,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let mut page = self.collect(|r| r.id > cursor.from_id && r.is_contained_in(start_date, end_date));
        page.sort_by_key(|r| r.id);
        page.truncate(cursor.limit as usize);
        Ok(page)
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect(|r| r.user_id == user_id))
    }

    async fn get_by_car_id(&self, car_id: Uuid) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect(|r| r.car_id == car_id))
    }

    async fn get_by_car_id_and_time_frame(
        &self,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect(|r| r.car_id == car_id && r.is_contained_in(start_date, end_date)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{CarStatus, CarType, UserStatus, UserType};

    fn car(city: &str) -> Car {
        Car {
            id: Uuid::new_v4(),
            car_type: CarType::Sedan,
            seats: 5,
            hourly_rent_cost: 30.0,
            city_name: city.to_string(),
            status: CarStatus::Available,
        }
    }

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: email.into(),
            user_type: UserType::Customer,
            status: UserStatus::Active,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 7, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn unknown_city_is_rejected() {
        let store = InMemoryStorage::with_cities(&["Chicago"]);
        assert_eq!(
            store.cars().insert(car("Gotham")).await,
            Err(DomainError::InvalidCityName)
        );
        assert_eq!(
            store.cars().list("Gotham", Cursor::first_page(10)).await,
            Err(DomainError::InvalidCityName)
        );
        assert_eq!(store.cities().list_names().await.unwrap(), vec!["Chicago"]);
    }

    #[tokio::test]
    async fn email_change_releases_old_address() {
        let store = InMemoryStorage::new();
        let mut u = user("a@example.com");
        store.users().insert(u.clone()).await.unwrap();
        store.users().insert(user("b@example.com")).await.unwrap();

        u.email = "b@example.com".into();
        assert_eq!(
            store.users().full_update(u.clone()).await,
            Err(DomainError::EmailAlreadyRegistered)
        );

        u.email = "c@example.com".into();
        store.users().full_update(u).await.unwrap();
        store.users().insert(user("a@example.com")).await.unwrap();
    }

    #[tokio::test]
    async fn reservations_require_existing_references() {
        let store = InMemoryStorage::new();
        let u = user("r@example.com");
        let c = car("Miami");

        let r = Reservation::candidate(u.id, c.id, at(1, 8), at(1, 16));
        assert_eq!(
            store.reservations().insert(r.clone()).await,
            Err(DomainError::UserNotFound)
        );

        store.users().insert(u.clone()).await.unwrap();
        assert_eq!(
            store.reservations().insert(r.clone()).await,
            Err(DomainError::CarNotFound)
        );

        store.cars().insert(c.clone()).await.unwrap();
        store.reservations().insert(r.clone()).await.unwrap();

        let mut unknown_user = r.clone();
        unknown_user.user_id = Uuid::new_v4();
        assert_eq!(
            store.reservations().full_update(unknown_user).await,
            Err(DomainError::UserNotFound)
        );

        let mut unknown_car = r.clone();
        unknown_car.car_id = Uuid::new_v4();
        assert_eq!(
            store.reservations().full_update(unknown_car).await,
            Err(DomainError::CarNotFound)
        );
        assert_eq!(store.reservations().get(r.id).await.unwrap(), r);

        store.users().delete(u.id).await.unwrap();
        assert!(store.reservations().get_by_car_id(c.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn time_frame_query_matches_contained_windows_only() {
        let store = InMemoryStorage::new();
        let u = user("t@example.com");
        let c = car("Miami");
        store.users().insert(u.clone()).await.unwrap();
        store.cars().insert(c.clone()).await.unwrap();

        let mut inside = Reservation::candidate(u.id, c.id, at(2, 9), at(2, 11));
        inside.id = Uuid::new_v4();
        let mut straddling = Reservation::candidate(u.id, c.id, at(2, 6), at(2, 9));
        straddling.id = Uuid::new_v4();
        store.reservations().insert(inside.clone()).await.unwrap();
        store.reservations().insert(straddling).await.unwrap();

        let found = store
            .reservations()
            .get_by_car_id_and_time_frame(c.id, at(2, 8), at(2, 14))
            .await
            .unwrap();
        assert_eq!(found, vec![inside]);
    }
}
