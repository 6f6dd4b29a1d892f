pub mod cars;
pub mod cities;
pub mod health;
pub mod metrics;
pub mod reservations;
pub mod users;
