use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

/// `{"success": true, "data": ...}`
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data) }
    }

    pub fn created(data: T) -> Response {
        (StatusCode::CREATED, Json(Self::ok(data))).into_response()
    }
}

impl ApiResponse<()> {
    pub fn empty() -> Self {
        Self { success: true, data: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
