//! Application services

mod cars;
mod cities;
mod reservations;
mod users;

pub use cars::{CarService, DEFAULT_CARS_PER_PAGE};
pub use cities::CityService;
pub use reservations::{ReservationService, DEFAULT_RESERVATIONS_PER_PAGE};
pub use users::UserService;
