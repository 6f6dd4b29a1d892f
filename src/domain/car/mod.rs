//! Car aggregate

pub mod model;
pub mod repository;

pub use model::{Car, CarStatus, CarType};
pub use repository::CarRepository;
