//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod car_repository;
pub mod city_repository;
pub mod errors;
pub mod repository_provider;
pub mod reservation_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::DatabaseConnection;

    use crate::infrastructure::database::{init_database, run_migrations, DatabaseConfig};

    /// Fresh, migrated in-memory SQLite database.
    pub async fn migrated_db() -> DatabaseConnection {
        let db = init_database(&DatabaseConfig::sqlite_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();
        db
    }
}
