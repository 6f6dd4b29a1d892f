//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CarService, CityService, ReservationService, UserService};
use crate::config::AppConfig;
use crate::domain::{
    CarStatus, CarType, PaymentStatus, RepositoryProvider, ReservationStatus, UserStatus, UserType,
};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::shared::SharedClock;

use super::modules::{cars, cities, health, metrics, reservations, users};

/// Unified router state. Axum hands each handler its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<CarService>,
    pub users: Arc<UserService>,
    pub cities: Arc<CityService>,
    pub reservations: Arc<ReservationService>,
    pub health: health::HealthState,
    pub metrics: metrics::MetricsState,
}

impl AppState {
    /// Wire every service over one repository provider.
    ///
    /// `db` is only used by `/health`; pass `None` for in-memory storage.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        config: &AppConfig,
        clock: SharedClock,
        db: Option<DatabaseConnection>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let reservations = ReservationService::new(repos.clone(), config.booking.clone(), clock)
            .with_page_size(config.pagination.reservations_per_page);
        let cars = CarService::new(repos.clone()).with_page_size(config.pagination.cars_per_page);

        Self {
            cars: Arc::new(cars),
            users: Arc::new(UserService::new(repos.clone())),
            cities: Arc::new(CityService::new(repos)),
            reservations: Arc::new(reservations),
            health: health::HealthState {
                db,
                started_at: Arc::new(Instant::now()),
            },
            metrics: metrics::MetricsState {
                handle: metrics_handle,
            },
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for cars::CarHandlerState {
    fn from_ref(s: &AppState) -> Self {
        cars::CarHandlerState {
            cars: Arc::clone(&s.cars),
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            users: Arc::clone(&s.users),
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for cities::CityHandlerState {
    fn from_ref(s: &AppState) -> Self {
        cities::CityHandlerState {
            service: Arc::clone(&s.cities),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationHandlerState {
    fn from_ref(s: &AppState) -> Self {
        reservations::ReservationHandlerState {
            service: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

impl FromRef<AppState> for metrics::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        s.metrics.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::ping,
        health::health_check,
        // Cars
        cars::register_car,
        cars::get_car,
        cars::update_car,
        cars::delete_car,
        cars::list_cars,
        cars::list_car_reservations,
        // Users
        users::sign_up,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::list_user_reservations,
        // Cities
        cities::list_city_names,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        reservations::list_reservations,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            // Cars
            CarType,
            CarStatus,
            cars::CarRequest,
            cars::CarDto,
            cars::CarListDto,
            // Users
            UserType,
            UserStatus,
            users::UserRequest,
            users::UserDto,
            // Reservations
            ReservationStatus,
            PaymentStatus,
            reservations::ReservationRequest,
            reservations::ReservationDto,
            reservations::ReservationListDto,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Cars", description = "Fleet management and per-car reservations"),
        (name = "Users", description = "Customer accounts and per-user reservations"),
        (name = "Cities", description = "Cities cars can be rented in"),
        (name = "Reservations", description = "Booking engine: create, replace, list and cancel reservations"),
    ),
    info(
        title = "Car Rental API",
        version = "1.0.0",
        description = "REST API for booking rental cars",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health / metrics
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/api/v1/ping", get(health::ping))
        // Cars
        .route("/api/v1/cars", get(cars::list_cars).post(cars::register_car))
        .route(
            "/api/v1/cars/{car_id}",
            get(cars::get_car)
                .put(cars::update_car)
                .delete(cars::delete_car),
        )
        .route(
            "/api/v1/cars/{car_id}/reservations",
            get(cars::list_car_reservations),
        )
        // Users
        .route("/api/v1/users", post(users::sign_up))
        .route(
            "/api/v1/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/users/{user_id}/reservations",
            get(users::list_user_reservations),
        )
        // Cities
        .route("/api/v1/cities/names", get(cities::list_city_names))
        // Reservations
        .route(
            "/api/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .with_state(state)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
