pub mod services;

// Re-export key types for convenience
pub use services::{CarService, CityService, ReservationService, UserService};
