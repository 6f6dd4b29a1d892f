//! Liveness (`/api/v1/ping`) and readiness (`/health`) endpoints

pub mod handlers;

pub use handlers::*;
