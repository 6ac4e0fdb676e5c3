//! Request extractors whose rejections use the API error envelope.
//!
//! axum's own `Json`, `Query` and `Path` answer a bad body or query string
//! with a plain-text 400. These wrappers deserialize the same way but reject
//! with `AppError::Validation`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);
