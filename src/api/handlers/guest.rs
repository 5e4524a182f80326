use axum::{extract::{State, Path}, response::IntoResponse};
use crate::state::AppState;
use crate::api::extractors::{admin::AdminUser, payload::{Params, Payload}};
use crate::api::dtos::{
    requests::{CreateGuestRequest, UpdateGuestRequest, GuestSearchQuery, PublicSearchQuery},
    responses::ApiResponse,
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<CreateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let guest = state.guest_service.create_guest(payload.into()).await?;
    Ok(ApiResponse::created(guest))
}

pub async fn get_guest(
    State(state): State<Arc<AppState>>,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = state.guest_service.get_guest_by_id(&guest_id).await?
        .ok_or(AppError::GuestNotFound)?;

    Ok(ApiResponse::ok(guest))
}

pub async fn update_guest(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(guest_id): Path<String>,
    Payload(payload): Payload<UpdateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let guest = state.guest_service.update_guest(&guest_id, payload.into()).await?;
    Ok(ApiResponse::ok(guest))
}

pub async fn delete_guest(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(guest_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.guest_service.delete_guest(&guest_id).await?;
    Ok(ApiResponse::empty())
}

pub async fn list_guests(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Params(query): Params<GuestSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let page = state.guest_service.search_guests(query.into()).await?;
    info!(
        total = page.pagination.total_count,
        page = page.pagination.page,
        "Admin guest search"
    );
    Ok(ApiResponse::ok(page))
}

pub async fn search_guests_public(
    State(state): State<Arc<AppState>>,
    Params(query): Params<PublicSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let guests = state.guest_service.search_guests_public(&query.q).await?;
    Ok(ApiResponse::ok(guests))
}
