//! Request extractors answering malformed input with the usual `{code, message}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. Unparsable or mistyped payloads become `400 bad_request`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Path parameters. Unparsable segments become `400 bad_request`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
