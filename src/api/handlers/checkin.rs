use axum::{extract::{State, Path}, response::IntoResponse};
use crate::state::AppState;
use crate::api::extractors::{admin::AdminUser, payload::Params};
use crate::api::dtos::{requests::CheckinListQuery, responses::ApiResponse};
use crate::error::AppError;
use std::sync::Arc;

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.checkin_service.check_in(&guest_id).await?;
    Ok(ApiResponse::created(record))
}

pub async fn check_out(
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.checkin_service.check_out(&guest_id).await?;
    Ok(ApiResponse::ok(record))
}

pub async fn list_checkins(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Params(query): Params<CheckinListQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date)
        && start > end {
        return Err(AppError::Validation("startDate must not be after endDate".into()));
    }

    let entries = state.checkin_service.list_checkins(&query.into()).await?;
    Ok(ApiResponse::ok(entries))
}
