//! Car HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::{CarService, ReservationService};
use crate::interfaces::http::common::{
    error_response, status_for, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::reservations::handlers::reservation_list;
use crate::interfaces::http::modules::reservations::ReservationDto;

use super::dto::*;

#[derive(Clone)]
pub struct CarHandlerState {
    pub cars: Arc<CarService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Car registered", body = ApiResponse<CarDto>),
        (status = 400, description = "Unknown city"),
        (status = 422, description = "Body failed validation")
    )
)]
pub async fn register_car(
    State(state): State<CarHandlerState>,
    ValidatedJson(request): ValidatedJson<CarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarDto>>), ApiError<CarDto>> {
    let car = state
        .cars
        .register(request.into_domain(Uuid::nil()))
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(car.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{car_id}",
    tag = "Cars",
    params(("car_id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(
    State(state): State<CarHandlerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarDto>>, ApiError<CarDto>> {
    let car = state
        .cars
        .get(car_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/cars/{car_id}",
    tag = "Cars",
    params(("car_id" = Uuid, Path, description = "Car ID")),
    request_body = CarRequest,
    responses(
        (status = 200, description = "Car replaced", body = ApiResponse<CarDto>),
        (status = 400, description = "Unknown city"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn update_car(
    State(state): State<CarHandlerState>,
    Path(car_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CarRequest>,
) -> Result<Json<ApiResponse<CarDto>>, ApiError<CarDto>> {
    let car = request.into_domain(car_id);
    state
        .cars
        .full_update(car.clone())
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(car.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cars/{car_id}",
    tag = "Cars",
    params(("car_id" = Uuid, Path, description = "Car ID")),
    responses((status = 204, description = "Car and its reservations deleted"))
)]
pub async fn delete_car(
    State(state): State<CarHandlerState>,
    Path(car_id): Path<Uuid>,
) -> Result<StatusCode, ApiError<EmptyData>> {
    state
        .cars
        .delete(car_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    params(ListCarsParams),
    responses(
        (status = 200, description = "One page of cars in the city", body = ApiResponse<CarListDto>),
        (status = 400, description = "Unknown city")
    )
)]
pub async fn list_cars(
    State(state): State<CarHandlerState>,
    Query(params): Query<ListCarsParams>,
) -> Result<Json<ApiResponse<CarListDto>>, ApiError<CarListDto>> {
    let page = state
        .cars
        .list(&params.city, params.from_car_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;

    Ok(Json(ApiResponse::success(CarListDto {
        cars: page.items.into_iter().map(CarDto::from).collect(),
        next_from_car_id: page.next_from_id,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{car_id}/reservations",
    tag = "Cars",
    params(("car_id" = Uuid, Path, description = "Car ID")),
    responses((status = 200, description = "Every reservation of the car", body = ApiResponse<Vec<ReservationDto>>))
)]
pub async fn list_car_reservations(
    State(state): State<CarHandlerState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError<Vec<ReservationDto>>> {
    let items = state
        .reservations
        .get_by_car_id(car_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(reservation_list(items))))
}
