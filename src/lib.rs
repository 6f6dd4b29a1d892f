//! # car-rental
//!
//! Car rental booking service: cars, users, cities and reservations behind
//! a REST API. The core is the reservation booking engine, which validates
//! a requested window and refuses to double-book a car.
//!
//! ## Architecture
//!
//! - **domain**: entities, domain errors and repository traits
//! - **application**: services, including the booking engine
//! - **infrastructure**: SeaORM repositories, migrations, in-memory storage
//! - **interfaces**: REST API with Swagger documentation and metrics
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::{create_api_router, AppState};
