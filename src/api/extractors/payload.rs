//! `Json` and `Query` whose rejections render as `VALIDATION_ERROR` envelopes.

use axum::extract::{FromRequest, FromRequestParts};
use crate::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Params<T>(pub T);
