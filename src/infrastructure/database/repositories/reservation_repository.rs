//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::errors::{db_err, violation, ForeignKeyTarget, Violation};
use crate::domain::reservation::{
    PaymentStatus, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, user};
use crate::shared::Cursor;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Map a failed insert/update to a domain error.
    ///
    /// SQLite reports a bare "FOREIGN KEY constraint failed", so when the
    /// message does not say which reference broke, the user row is looked
    /// up and the car is blamed if the user exists.
    async fn write_err(&self, e: DbErr, user_id: Uuid) -> DomainError {
        match violation(&e) {
            Some(Violation::Exclusion) => DomainError::CarNotAvailable,
            Some(Violation::ForeignKey(Some(ForeignKeyTarget::User))) => DomainError::UserNotFound,
            Some(Violation::ForeignKey(Some(ForeignKeyTarget::Car))) => DomainError::CarNotFound,
            Some(Violation::ForeignKey(None)) => {
                match user::Entity::find_by_id(user_id).count(&self.db).await {
                    Ok(0) => DomainError::UserNotFound,
                    Ok(_) => DomainError::CarNotFound,
                    Err(lookup) => db_err(lookup),
                }
            }
            _ => db_err(e),
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status = ReservationStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!(
            "reservation {} has unknown status {:?}",
            m.id, m.status
        ))
    })?;
    let payment_status = PaymentStatus::parse(&m.payment_status).ok_or_else(|| {
        DomainError::Storage(format!(
            "reservation {} has unknown payment status {:?}",
            m.id, m.payment_status
        ))
    })?;

    Ok(Reservation {
        id: m.id,
        user_id: m.user_id,
        car_id: m.car_id,
        status,
        payment_status,
        start_date: m.start_date,
        end_date: m.end_date,
    })
}

fn models_to_domain(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

fn domain_to_active(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        user_id: Set(r.user_id),
        car_id: Set(r.car_id),
        status: Set(r.status.as_str().to_string()),
        payment_status: Set(r.payment_status.as_str().to_string()),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, r: Reservation) -> DomainResult<()> {
        debug!("Inserting reservation: {} for car {}", r.id, r.car_id);

        if let Err(e) = domain_to_active(&r).insert(&self.db).await {
            return Err(self.write_err(e, r.user_id).await);
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Reservation> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::ReservationNotFound)?;
        model_to_domain(model)
    }

    async fn full_update(&self, r: Reservation) -> DomainResult<()> {
        debug!("Updating reservation: {}", r.id);

        let result = reservation::Entity::update_many()
            .set(domain_to_active(&r))
            .filter(reservation::Column::Id.eq(r.id))
            .exec(&self.db)
            .await;

        match result {
            Ok(res) if res.rows_affected == 0 => Err(DomainError::ReservationNotFound),
            Ok(_) => Ok(()),
            Err(e) => Err(self.write_err(e, r.user_id).await),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting reservation: {}", id);
        reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        cursor: Cursor,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Id.gt(cursor.from_id))
            .filter(reservation::Column::StartDate.between(start_date, end_date))
            .filter(reservation::Column::EndDate.between(start_date, end_date))
            .order_by_asc(reservation::Column::Id)
            .limit(u64::from(cursor.limit))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn get_by_car_id(&self, car_id: Uuid) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::CarId.eq(car_id))
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn get_by_car_id_and_time_frame(
        &self,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::CarId.eq(car_id))
            .filter(reservation::Column::StartDate.between(start_date, end_date))
            .filter(reservation::Column::EndDate.between(start_date, end_date))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }
}
