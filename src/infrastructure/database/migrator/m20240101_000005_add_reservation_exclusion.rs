//! Forbid overlapping Reserved windows for the same car (PostgreSQL only)
//!
//! The booking engine checks for conflicts before writing, but two
//! processes can still race between check and insert. The exclusion
//! constraint makes the database reject the loser; the repository maps
//! the violation to `CarNotAvailable`. SQLite has no equivalent, so the
//! migration is a no-op there.
//!
//! The constraint uses true overlap, so on PostgreSQL it also overrides a
//! `containment` conflict rule: partially overlapping windows are refused.

use sea_orm::{ConnectionTrait, DbBackend};
use sea_orm_migration::prelude::*;

pub const RESERVATION_EXCLUSION_CONSTRAINT: &str = "excl_reservations_car_window";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        let db = manager.get_connection();
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gist")
            .await?;
        db.execute_unprepared(&format!(
            "ALTER TABLE reservations ADD CONSTRAINT {RESERVATION_EXCLUSION_CONSTRAINT} \
             EXCLUDE USING gist (car_id WITH =, tstzrange(start_date, end_date) WITH &&) \
             WHERE (status = 'Reserved')"
        ))
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE reservations DROP CONSTRAINT IF EXISTS {RESERVATION_EXCLUSION_CONSTRAINT}"
            ))
            .await?;
        Ok(())
    }
}
