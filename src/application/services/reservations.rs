//! Reservation booking service
//!
//! Validates a proposed reservation against the booking rules and, when it
//! passes, persists it through the reservation repository. Rules are checked
//! in a fixed order and the first failure is returned:
//!
//! 1. the window is well formed (`start < end`)
//! 2. the window does not start in the past
//! 3. the window is at least `minimum_reservation_hours` long
//! 4. no other Reserved reservation of the same car conflicts with it
//!
//! Check and write for the same car are serialised inside the process by a
//! per-car async lock. Across processes, the PostgreSQL exclusion constraint
//! rejects the loser of a race and the repository reports `CarNotAvailable`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{BookingConfig, ConflictRule};
use crate::domain::reservation::is_valid_time_frame;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Reservation};
use crate::shared::{Cursor, CursorPage, SharedClock};

pub const DEFAULT_RESERVATIONS_PER_PAGE: u16 = 50;

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    config: BookingConfig,
    clock: SharedClock,
    page_size: u16,
    car_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: BookingConfig, clock: SharedClock) -> Self {
        Self {
            repos,
            config,
            clock,
            page_size: DEFAULT_RESERVATIONS_PER_PAGE,
            car_locks: DashMap::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    // ── Booking ─────────────────────────────────────────────────

    /// Validate `candidate`, assign it a fresh id and persist it.
    ///
    /// Any id already on the candidate is ignored. Nothing is written when
    /// validation fails.
    pub async fn book(&self, mut candidate: Reservation) -> DomainResult<Reservation> {
        let car_id = candidate.car_id;
        let result = self
            .with_car_lock(car_id, async move {
                candidate.id = Uuid::nil();
                self.check_reservation(&candidate).await?;

                candidate.id = Uuid::new_v4();
                self.repos.reservations().insert(candidate.clone()).await?;
                Ok(candidate)
            })
            .await;

        match &result {
            Ok(r) => {
                metrics::counter!("reservations_booked_total").increment(1);
                info!(
                    reservation_id = %r.id,
                    car_id = %r.car_id,
                    user_id = %r.user_id,
                    start = %r.start_date,
                    end = %r.end_date,
                    "Reservation booked"
                );
            }
            Err(e) => self.record_rejection("book", car_id, e),
        }
        result
    }

    /// Re-validate and replace the reservation identified by `candidate.id`.
    pub async fn full_update(&self, candidate: Reservation) -> DomainResult<()> {
        let car_id = candidate.car_id;
        let id = candidate.id;
        let result = self
            .with_car_lock(car_id, async move {
                self.check_reservation(&candidate).await?;
                self.repos.reservations().full_update(candidate).await
            })
            .await;

        match &result {
            Ok(()) => info!(reservation_id = %id, car_id = %car_id, "Reservation updated"),
            Err(e) => self.record_rejection("update", car_id, e),
        }
        result
    }

    /// Apply the booking rules to `candidate` without writing anything.
    pub async fn check_reservation(&self, candidate: &Reservation) -> DomainResult<()> {
        let (start, end) = (candidate.start_date, candidate.end_date);

        if !is_valid_time_frame(start, end) {
            return Err(DomainError::InvalidReservationTimeFrame);
        }

        if start < self.clock.now() {
            return Err(DomainError::InvalidReservationTimeFrame);
        }

        let hours = self.config.minimum_reservation_hours;
        if candidate.duration() < Duration::hours(i64::from(hours)) {
            return Err(DomainError::MinimumReservationHours { hours });
        }

        let conflicts = self.conflicting(candidate, start, end).await?;
        if let Some(existing) = conflicts.first() {
            debug!(
                car_id = %candidate.car_id,
                conflicting_id = %existing.id,
                "Reservation window conflicts with an existing booking"
            );
            return Err(DomainError::CarNotAvailable);
        }

        Ok(())
    }

    async fn conflicting(
        &self,
        candidate: &Reservation,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let blocks = |r: &Reservation| r.is_reserved() && r.id != candidate.id;

        let mut found: Vec<Reservation> = self
            .repos
            .reservations()
            .get_by_car_id_and_time_frame(candidate.car_id, start, end)
            .await?
            .into_iter()
            .filter(|r| blocks(r))
            .collect();

        if found.is_empty() && self.config.conflict_rule == ConflictRule::Overlap {
            found = self
                .repos
                .reservations()
                .get_by_car_id(candidate.car_id)
                .await?
                .into_iter()
                .filter(|r| blocks(r) && r.overlaps(start, end))
                .collect();
        }

        Ok(found)
    }

    async fn with_car_lock<T>(
        &self,
        car_id: Uuid,
        op: impl std::future::Future<Output = DomainResult<T>>,
    ) -> DomainResult<T> {
        let lock = self.car_locks.entry(car_id).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            op.await
        };
        drop(lock);
        // forget locks nobody else is waiting on
        self.car_locks
            .remove_if(&car_id, |_, l| Arc::strong_count(l) == 1);
        result
    }

    fn record_rejection(&self, op: &'static str, car_id: Uuid, e: &DomainError) {
        if e.is_infrastructure() {
            warn!(car_id = %car_id, error = %e, "Reservation {} failed", op);
        } else {
            metrics::counter!("reservations_rejected_total", "reason" => e.kind()).increment(1);
            info!(car_id = %car_id, reason = e.kind(), "Reservation {} rejected", op);
        }
    }

    // ── Reads and deletes ───────────────────────────────────────

    pub async fn get(&self, id: Uuid) -> DomainResult<Reservation> {
        self.repos.reservations().get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.repos.reservations().delete(id).await?;
        info!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }

    pub async fn get_by_car_id(&self, car_id: Uuid) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().get_by_car_id(car_id).await
    }

    pub async fn get_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().get_by_user_id(user_id).await
    }

    /// One page of reservations whose window lies inside `[start, end]`.
    pub async fn list(
        &self,
        from_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<CursorPage<Reservation>> {
        if !is_valid_time_frame(start, end) {
            return Err(DomainError::InvalidReservationTimeFrame);
        }
        let cursor = Cursor::new(from_id, self.page_size);
        let items = self.repos.reservations().list(cursor, start, end).await?;
        Ok(CursorPage::new(items, cursor.limit, |r| r.id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{
        CarRepository, CityRepository, ReservationRepository, ReservationStatus, UserRepository,
    };
    use crate::infrastructure::InMemoryStorage;
    use crate::shared::FixedClock;

    // ── Fakes ───────────────────────────────────────────────────

    /// Reservation gateway that returns canned query results and records writes.
    #[derive(Default)]
    struct RecordingReservations {
        in_time_frame: StdMutex<Vec<Reservation>>,
        by_car: StdMutex<Vec<Reservation>>,
        insert_error: StdMutex<Option<DomainError>>,
        query_error: StdMutex<Option<DomainError>>,
        inserted: StdMutex<Vec<Reservation>>,
        updated: StdMutex<Vec<Reservation>>,
        time_frame_calls: AtomicUsize,
    }

    #[async_trait]
    impl ReservationRepository for RecordingReservations {
        async fn insert(&self, r: Reservation) -> DomainResult<()> {
            if let Some(e) = self.insert_error.lock().unwrap().clone() {
                return Err(e);
            }
            self.inserted.lock().unwrap().push(r);
            Ok(())
        }

        async fn get(&self, _id: Uuid) -> DomainResult<Reservation> {
            Err(DomainError::ReservationNotFound)
        }

        async fn full_update(&self, r: Reservation) -> DomainResult<()> {
            self.updated.lock().unwrap().push(r);
            Ok(())
        }

        async fn delete(&self, _id: Uuid) -> DomainResult<()> {
            Ok(())
        }

        async fn list(
            &self,
            _cursor: Cursor,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> DomainResult<Vec<Reservation>> {
            Ok(Vec::new())
        }

        async fn get_by_user_id(&self, _user_id: Uuid) -> DomainResult<Vec<Reservation>> {
            Ok(Vec::new())
        }

        async fn get_by_car_id(&self, _car_id: Uuid) -> DomainResult<Vec<Reservation>> {
            Ok(self.by_car.lock().unwrap().clone())
        }

        async fn get_by_car_id_and_time_frame(
            &self,
            _car_id: Uuid,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> DomainResult<Vec<Reservation>> {
            self.time_frame_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = self.query_error.lock().unwrap().clone() {
                return Err(e);
            }
            Ok(self.in_time_frame.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct FakeRepos {
        store: InMemoryStorage,
        reservations: RecordingReservations,
    }

    impl RepositoryProvider for FakeRepos {
        fn cars(&self) -> &dyn CarRepository {
            self.store.cars()
        }

        fn users(&self) -> &dyn UserRepository {
            self.store.users()
        }

        fn cities(&self) -> &dyn CityRepository {
            self.store.cities()
        }

        fn reservations(&self) -> &dyn ReservationRepository {
            &self.reservations
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 10, 12, 0, 0).unwrap()
    }

    fn service_with(repos: Arc<FakeRepos>, config: BookingConfig) -> ReservationService {
        ReservationService::new(repos, config, Arc::new(FixedClock(now())))
    }

    fn service() -> (Arc<FakeRepos>, ReservationService) {
        let repos = Arc::new(FakeRepos::default());
        (repos.clone(), service_with(repos, BookingConfig::default()))
    }

    fn candidate(start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation::candidate(Uuid::new_v4(), Uuid::new_v4(), start, end)
    }

    fn existing(car_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        let mut r = Reservation::candidate(Uuid::new_v4(), car_id, start, end);
        r.id = Uuid::new_v4();
        r
    }

    // ── Rule order ──────────────────────────────────────────────

    #[tokio::test]
    async fn inverted_or_empty_window_is_invalid() {
        let (_, svc) = service();
        let start = now() + Duration::hours(1);

        assert_eq!(
            svc.check_reservation(&candidate(start, start)).await,
            Err(DomainError::InvalidReservationTimeFrame)
        );
        assert_eq!(
            svc.check_reservation(&candidate(start, start - Duration::hours(8)))
                .await,
            Err(DomainError::InvalidReservationTimeFrame)
        );
    }

    #[tokio::test]
    async fn window_starting_in_the_past_is_invalid() {
        let (repos, svc) = service();
        let r = candidate(now() - Duration::minutes(1), now());

        assert_eq!(svc.book(r).await, Err(DomainError::InvalidReservationTimeFrame));
        assert!(repos.reservations.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn starting_exactly_now_is_allowed() {
        let (_, svc) = service();
        let r = candidate(now(), now() + Duration::hours(6));
        assert_eq!(svc.check_reservation(&r).await, Ok(()));
    }

    #[tokio::test]
    async fn short_window_reports_configured_threshold() {
        let (repos, svc) = service();
        let start = now() + Duration::hours(1);
        let r = candidate(start, start + Duration::seconds(1));

        let err = svc.book(r).await.unwrap_err();
        assert_eq!(err, DomainError::MinimumReservationHours { hours: 6 });
        assert!(err.to_string().contains("6 hours"));
        assert!(repos.reservations.inserted.lock().unwrap().is_empty());
        // rejected before the store is queried
        assert_eq!(repos.reservations.time_frame_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn threshold_comes_from_config() {
        let repos = Arc::new(FakeRepos::default());
        let svc = service_with(
            repos,
            BookingConfig {
                minimum_reservation_hours: 1,
                ..BookingConfig::default()
            },
        );
        let start = now() + Duration::hours(1);
        assert_eq!(
            svc.check_reservation(&candidate(start, start + Duration::hours(1)))
                .await,
            Ok(())
        );
        assert_eq!(
            svc.check_reservation(&candidate(start, start + Duration::minutes(59)))
                .await,
            Err(DomainError::MinimumReservationHours { hours: 1 })
        );
    }

    // ── Booking ─────────────────────────────────────────────────

    #[tokio::test]
    async fn free_window_is_booked_with_fresh_id() {
        let (repos, svc) = service();
        let r = candidate(now() + Duration::hours(1), now() + Duration::days(7));

        let booked = svc.book(r.clone()).await.unwrap();
        assert!(!booked.id.is_nil());
        assert_eq!(booked.user_id, r.user_id);
        assert_eq!(booked.car_id, r.car_id);
        assert_eq!(booked.start_date, r.start_date);
        assert_eq!(booked.end_date, r.end_date);

        let inserted = repos.reservations.inserted.lock().unwrap().clone();
        assert_eq!(inserted, vec![booked]);
    }

    #[tokio::test]
    async fn client_supplied_id_is_replaced() {
        let (_, svc) = service();
        let mut r = candidate(now() + Duration::hours(1), now() + Duration::days(1));
        r.id = Uuid::new_v4();

        let booked = svc.book(r.clone()).await.unwrap();
        assert_ne!(booked.id, r.id);
    }

    #[tokio::test]
    async fn reserved_booking_in_window_blocks() {
        let (repos, svc) = service();
        let r = candidate(now() + Duration::hours(1), now() + Duration::days(30));
        repos.reservations.in_time_frame.lock().unwrap().push(existing(
            r.car_id,
            now() + Duration::days(2),
            now() + Duration::days(3),
        ));

        assert_eq!(svc.book(r).await, Err(DomainError::CarNotAvailable));
        assert!(repos.reservations.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn canceled_booking_in_window_does_not_block() {
        let (repos, svc) = service();
        let r = candidate(now() + Duration::hours(1), now() + Duration::days(30));
        let mut canceled = existing(r.car_id, now() + Duration::days(2), now() + Duration::days(3));
        canceled.status = ReservationStatus::Canceled;
        repos.reservations.in_time_frame.lock().unwrap().push(canceled);

        assert!(svc.book(r).await.is_ok());
    }

    #[tokio::test]
    async fn foreign_key_error_from_store_is_returned() {
        let (repos, svc) = service();
        *repos.reservations.insert_error.lock().unwrap() = Some(DomainError::CarNotFound);
        let r = candidate(now() + Duration::hours(1), now() + Duration::days(1));

        assert_eq!(svc.book(r).await, Err(DomainError::CarNotFound));
    }

    #[tokio::test]
    async fn store_query_failure_is_propagated_unchanged() {
        let (repos, svc) = service();
        let failure = DomainError::Storage("connection reset".into());
        *repos.reservations.query_error.lock().unwrap() = Some(failure.clone());
        let r = candidate(now() + Duration::hours(1), now() + Duration::days(1));

        assert_eq!(svc.book(r).await, Err(failure));
        assert!(repos.reservations.inserted.lock().unwrap().is_empty());
    }

    // ── Updates ─────────────────────────────────────────────────

    #[tokio::test]
    async fn update_does_not_conflict_with_itself() {
        let (repos, svc) = service();
        let old = existing(Uuid::new_v4(), now() + Duration::days(1), now() + Duration::days(2));
        repos.reservations.in_time_frame.lock().unwrap().push(old.clone());

        let mut widened = old.clone();
        widened.start_date = now() + Duration::hours(12);
        widened.end_date = now() + Duration::days(3);

        svc.full_update(widened.clone()).await.unwrap();
        assert_eq!(*repos.reservations.updated.lock().unwrap(), vec![widened]);
    }

    #[tokio::test]
    async fn update_into_the_past_is_rejected() {
        let (repos, svc) = service();
        let r = existing(Uuid::new_v4(), now() - Duration::hours(2), now() + Duration::days(1));

        assert_eq!(
            svc.full_update(r).await,
            Err(DomainError::InvalidReservationTimeFrame)
        );
        assert!(repos.reservations.updated.lock().unwrap().is_empty());
    }

    // ── Conflict rules ──────────────────────────────────────────

    #[tokio::test]
    async fn overlap_rule_catches_partial_overlap() {
        let repos = Arc::new(FakeRepos::default());
        let r = candidate(now() + Duration::days(1), now() + Duration::days(2));
        // starts before the candidate and ends inside it
        repos.reservations.by_car.lock().unwrap().push(existing(
            r.car_id,
            now() + Duration::hours(12),
            now() + Duration::days(1) + Duration::hours(6),
        ));

        let containment = service_with(repos.clone(), BookingConfig::default());
        assert_eq!(containment.check_reservation(&r).await, Ok(()));

        let overlap = service_with(
            repos,
            BookingConfig {
                conflict_rule: ConflictRule::Overlap,
                ..BookingConfig::default()
            },
        );
        assert_eq!(
            overlap.check_reservation(&r).await,
            Err(DomainError::CarNotAvailable)
        );
    }

    #[tokio::test]
    async fn exclusion_refusal_overrides_containment_rule() {
        let repos = Arc::new(FakeRepos::default());
        let r = candidate(now() + Duration::days(1), now() + Duration::days(2));
        repos.reservations.by_car.lock().unwrap().push(existing(
            r.car_id,
            now() + Duration::hours(12),
            now() + Duration::days(1) + Duration::hours(6),
        ));
        // what the PostgreSQL exclusion constraint reports for that overlap
        *repos.reservations.insert_error.lock().unwrap() = Some(DomainError::CarNotAvailable);

        let svc = service_with(repos.clone(), BookingConfig::default());
        assert_eq!(svc.check_reservation(&r).await, Ok(()));
        assert_eq!(svc.book(r).await, Err(DomainError::CarNotAvailable));
        assert!(repos.reservations.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn overlap_rule_ignores_touching_windows() {
        let repos = Arc::new(FakeRepos::default());
        let r = candidate(now() + Duration::days(1), now() + Duration::days(2));
        repos.reservations.by_car.lock().unwrap().push(existing(
            r.car_id,
            now() + Duration::hours(6),
            now() + Duration::days(1),
        ));

        let svc = service_with(
            repos,
            BookingConfig {
                conflict_rule: ConflictRule::Overlap,
                ..BookingConfig::default()
            },
        );
        assert_eq!(svc.check_reservation(&r).await, Ok(()));
    }

    // ── End to end over the in-memory store ─────────────────────

    #[tokio::test]
    async fn concurrent_bookings_for_one_car_admit_one() {
        use crate::domain::{Car, CarStatus, CarType, User, UserStatus, UserType};

        let store = Arc::new(InMemoryStorage::new());
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Lin".into(),
            last_name: "Yu".into(),
            email: "lin@example.com".into(),
            user_type: UserType::Customer,
            status: UserStatus::Active,
        };
        let car = Car {
            id: Uuid::new_v4(),
            car_type: CarType::Luxury,
            seats: 4,
            hourly_rent_cost: 80.0,
            city_name: "Miami".into(),
            status: CarStatus::Available,
        };
        store.users().insert(user.clone()).await.unwrap();
        store.cars().insert(car.clone()).await.unwrap();

        let svc = Arc::new(ReservationService::new(
            store.clone(),
            BookingConfig::default(),
            Arc::new(FixedClock(now())),
        ));
        let start = now() + Duration::days(1);
        let end = start + Duration::hours(8);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = svc.clone();
            let r = Reservation::candidate(user.id, car.id, start, end);
            handles.push(tokio::spawn(async move { svc.book(r).await }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e, DomainError::CarNotAvailable),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(svc.get_by_car_id(car.id).await.unwrap().len(), 1);
        assert!(svc.car_locks.is_empty());
    }

    #[tokio::test]
    async fn listing_requires_a_valid_window() {
        let (_, svc) = service();
        let t = now();
        assert!(matches!(
            svc.list(None, t, t).await,
            Err(DomainError::InvalidReservationTimeFrame)
        ));
        let page = svc.list(None, t, t + Duration::days(1)).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_from_id.is_none());
    }
}
