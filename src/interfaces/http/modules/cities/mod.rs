//! City lookups

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::application::CityService;
use crate::interfaces::http::common::{error_response, status_for, ApiError, ApiResponse};

#[derive(Clone)]
pub struct CityHandlerState {
    pub service: Arc<CityService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/cities/names",
    tag = "Cities",
    responses((status = 200, description = "City names, alphabetical", body = ApiResponse<Vec<String>>))
)]
pub async fn list_city_names(
    State(state): State<CityHandlerState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError<Vec<String>>> {
    let names = state
        .service
        .list_names()
        .await
        .map_err(|e| error_response(status_for(&e), e))?;
    Ok(Json(ApiResponse::success(names)))
}
