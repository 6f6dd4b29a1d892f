//! Database entities module

pub mod car;
pub mod city;
pub mod reservation;
pub mod user;

pub use car::Entity as Car;
pub use city::Entity as City;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
