//! Extractors whose rejections render through [`AppError`] instead of axum's
//! plain-text defaults, so malformed bodies and ids come back as `{"message": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::app_error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
