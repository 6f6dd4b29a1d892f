//! Translation of `DbErr` into domain errors
//!
//! Constraint violations are recognised through `DbErr::sql_err`, which
//! understands both the SQLite and PostgreSQL error codes. PostgreSQL names
//! the violated constraint in the message; SQLite does not, so callers get
//! [`Violation::ForeignKey`] with `None` and must work out which reference
//! was dangling themselves.

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;
use crate::infrastructure::database::migrator::{
    FK_RESERVATIONS_CAR, FK_RESERVATIONS_USER, RESERVATION_EXCLUSION_CONSTRAINT,
};

/// Which reference a foreign-key violation points at, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyTarget {
    User,
    Car,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    ForeignKey(Option<ForeignKeyTarget>),
    Unique,
    Exclusion,
}

pub fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Classify a write failure; `None` means it is not a constraint violation.
pub fn violation(e: &DbErr) -> Option<Violation> {
    let message = e.to_string();
    if message.contains(RESERVATION_EXCLUSION_CONSTRAINT) {
        return Some(Violation::Exclusion);
    }

    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            Some(Violation::ForeignKey(foreign_key_target(&detail)))
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(Violation::Unique),
        _ => None,
    }
}

fn foreign_key_target(detail: &str) -> Option<ForeignKeyTarget> {
    if detail.contains(FK_RESERVATIONS_USER) || detail.contains("user_id") {
        Some(ForeignKeyTarget::User)
    } else if detail.contains(FK_RESERVATIONS_CAR) || detail.contains("car_id") {
        Some(ForeignKeyTarget::Car)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_constraint_names_pick_the_target() {
        assert_eq!(
            foreign_key_target(
                "insert or update on table \"reservations\" violates foreign key constraint \"fk_reservations_user\""
            ),
            Some(ForeignKeyTarget::User)
        );
        assert_eq!(
            foreign_key_target("Key (car_id)=(...) is not present in table \"cars\"."),
            Some(ForeignKeyTarget::Car)
        );
        assert_eq!(foreign_key_target("FOREIGN KEY constraint failed"), None);
    }

    #[test]
    fn exclusion_constraint_is_recognised_by_name() {
        let err = DbErr::Custom(format!(
            "conflicting key value violates exclusion constraint \"{RESERVATION_EXCLUSION_CONSTRAINT}\""
        ));
        assert_eq!(violation(&err), Some(Violation::Exclusion));
    }

    #[test]
    fn other_errors_are_not_violations() {
        assert_eq!(violation(&DbErr::Custom("connection reset".into())), None);
        assert!(matches!(
            db_err(DbErr::Custom("boom".into())),
            DomainError::Storage(_)
        ));
    }
}
