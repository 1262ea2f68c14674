use actix_web::{error::JsonPayloadError, Error, HttpRequest};

use crate::core::AppError;

/// Maps JSON extractor failures (missing fields, wrong types, bad syntax) to
/// a validation error so they share the standard error body.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected malformed request body");

    AppError::validation(format!("Invalid request body: {}", err)).into()
}
