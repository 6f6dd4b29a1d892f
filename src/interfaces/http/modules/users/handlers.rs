//! User HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::{ReservationService, UserService};
use crate::interfaces::http::common::{
    error_response, status_for, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::modules::reservations::handlers::reservation_list;
use crate::interfaces::http::modules::reservations::ReservationDto;

use super::dto::*;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User signed up", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Body failed validation")
    )
)]
pub async fn sign_up(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let user = state
        .users
        .sign_up(request.into_domain(Uuid::nil()))
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let user = state
        .users
        .get(user_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User replaced", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let user = request.into_domain(user_id);
    state
        .users
        .full_update(user.clone())
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User and their reservations deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError<EmptyData>> {
    state
        .users
        .delete(user_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/reservations",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "Every reservation of the user", body = ApiResponse<Vec<ReservationDto>>))
)]
pub async fn list_user_reservations(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError<Vec<ReservationDto>>> {
    let items = state
        .reservations
        .get_by_user_id(user_id)
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(reservation_list(items))))
}
