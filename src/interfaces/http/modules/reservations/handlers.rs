//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::ReservationService;
use crate::domain::{DomainError, Reservation};
use crate::interfaces::http::common::{
    error_response, status_for, ApiError, ApiResponse, EmptyData, ValidatedJson,
};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationHandlerState {
    pub service: Arc<ReservationService>,
}

/// User and car ids arrive in the request body, so a dangling one is a bad
/// request rather than a missing resource.
pub(crate) fn reservation_error<T>(e: DomainError) -> ApiError<T> {
    let status = match e {
        DomainError::UserNotFound | DomainError::CarNotFound => StatusCode::BAD_REQUEST,
        _ => status_for(&e),
    };
    error_response(status, e)
}

pub(crate) fn reservation_list(items: Vec<Reservation>) -> Vec<ReservationDto> {
    items.into_iter().map(ReservationDto::from).collect()
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation booked", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid window, car not available, or unknown user/car"),
        (status = 422, description = "Body failed validation")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError<ReservationDto>> {
    let booked = state
        .service
        .book(request.into_domain(Uuid::nil()))
        .await
        .map_err(reservation_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(booked))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    let reservation = state
        .service
        .get(reservation_id)
        .await
        .map_err(reservation_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = Uuid, Path, description = "Reservation ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation replaced", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid window, car not available, or unknown user/car"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationHandlerState>,
    Path(reservation_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    let reservation = request.into_domain(reservation_id);
    state
        .service
        .full_update(reservation.clone())
        .await
        .map_err(reservation_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = Uuid, Path, description = "Reservation ID")),
    responses((status = 204, description = "Reservation deleted (or never existed)"))
)]
pub async fn delete_reservation(
    State(state): State<ReservationHandlerState>,
    Path(reservation_id): Path<Uuid>,
) -> Result<StatusCode, ApiError<EmptyData>> {
    state
        .service
        .delete(reservation_id)
        .await
        .map_err(reservation_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ListReservationsParams),
    responses(
        (status = 200, description = "One page of reservations", body = ApiResponse<ReservationListDto>),
        (status = 400, description = "Invalid window")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationHandlerState>,
    Query(params): Query<ListReservationsParams>,
) -> Result<Json<ApiResponse<ReservationListDto>>, ApiError<ReservationListDto>> {
    let page = state
        .service
        .list(params.from_reservation_id, params.start_date, params.end_date)
        .await
        .map_err(reservation_error)?;

    Ok(Json(ApiResponse::success(
        ReservationListDto::from_reservations(page.items, page.next_from_id),
    )))
}
