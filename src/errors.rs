use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::models::form::types::SchemaError;
use crate::models::form::validate::PayloadError;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Hash(String),
    Session(String),
    Forbidden(String),
    BadRequest(String),
    Schema(SchemaError),
    Payload(PayloadError),
    NotFound,
}

/// JSON error body for API responses.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    fn new(error: &str, details: Option<String>) -> Self {
        ApiErrorResponse {
            error: error.to_string(),
            details,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Forbidden(capability) => write!(f, "Forbidden: requires {capability}"),
            AppError::BadRequest(e) => write!(f, "Bad request: {e}"),
            AppError::Schema(e) => write!(f, "Invalid form structure: {e}"),
            AppError::Payload(e) => write!(f, "Invalid submission: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => {
                HttpResponse::NotFound().json(ApiErrorResponse::new("Not found", None))
            }
            AppError::Forbidden(capability) => HttpResponse::Forbidden().json(
                ApiErrorResponse::new("Forbidden", Some(format!("requires {capability}"))),
            ),
            AppError::Session(_) => HttpResponse::Unauthorized()
                .json(ApiErrorResponse::new("Authentication required", None)),
            AppError::BadRequest(msg) => HttpResponse::BadRequest()
                .json(ApiErrorResponse::new("Bad request", Some(msg.clone()))),
            AppError::Schema(e) => HttpResponse::UnprocessableEntity().json(
                ApiErrorResponse::new("Invalid form structure", Some(e.to_string())),
            ),
            AppError::Payload(e) => HttpResponse::UnprocessableEntity().json(
                ApiErrorResponse::new("Invalid submission", Some(e.to_string())),
            ),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(ApiErrorResponse::new("Internal server error", None))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}

impl From<SchemaError> for AppError {
    fn from(e: SchemaError) -> Self {
        AppError::Schema(e)
    }
}

impl From<PayloadError> for AppError {
    fn from(e: PayloadError) -> Self {
        AppError::Payload(e)
    }
}
