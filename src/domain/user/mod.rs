//! User aggregate

pub mod model;
pub mod repository;

pub use model::{User, UserStatus, UserType};
pub use repository::UserRepository;
