pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::DatabaseSection;

pub use migrator::Migrator;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./car-rental.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&DatabaseSection::default())
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.connection_url(),
            max_connections: section.max_connections.max(1),
            min_connections: section.min_connections,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }

    /// Private in-memory SQLite database.
    ///
    /// Every pooled connection to `sqlite::memory:` would open its own empty
    /// database, so the pool is pinned to a single connection.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        }
    }

    /// Url with credentials masked, for logs.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme), Some(at)) if at > scheme => {
                format!("{}://***{}", &self.url[..scheme], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", config.redacted_url());

    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Apply every pending migration.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    info!("Running database migrations");
    Migrator::up(db, None).await?;
    info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_hidden_in_logs() {
        let cfg = DatabaseConfig {
            url: "postgres://rent:secret@db:5432/rent".to_string(),
            max_connections: 5,
            min_connections: 1,
        };
        assert_eq!(cfg.redacted_url(), "postgres://***@db:5432/rent");
        assert_eq!(
            DatabaseConfig::sqlite("./x.db").redacted_url(),
            "sqlite://./x.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn migrations_seed_cities() {
        let db = init_database(&DatabaseConfig::sqlite_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();

        use sea_orm::{EntityTrait, PaginatorTrait};
        let count = entities::City::find().count(&db).await.unwrap();
        assert_eq!(count as usize, migrator::SEED_CITIES.len());
    }
}
