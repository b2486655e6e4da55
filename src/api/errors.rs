//! HTTP error layer.
//!
//! Resources answer client errors with a JSON body of the form
//! `{"title": ..., "description": ...}`. Framework errors that reach the
//! layer are logged and answered with a generic 500 response so that no
//! internals leak to the client.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::errors::MxxnError;
use crate::system::logging::targets;

#[derive(Debug)]
pub enum ApiError {
    BadRequest { title: String, description: String },
    NotFound,
    Internal(MxxnError),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

impl ApiError {
    pub fn bad_request(title: impl Into<String>, description: impl Into<String>) -> Self {
        ApiError::BadRequest {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { title, description } => write!(f, "{}: {}", title, description),
            ApiError::NotFound => write!(f, "Not Found"),
            ApiError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::BadRequest { title, description } => ErrorBody {
                title,
                description: Some(description),
            },
            ApiError::NotFound => ErrorBody {
                title: "404 Not Found",
                description: None,
            },
            ApiError::Internal(err) => {
                error!(
                    target: targets::REQUEST,
                    code = err.code(),
                    "Unhandled error while processing the request: {}",
                    err
                );
                ErrorBody {
                    title: "500 Internal Server Error",
                    description: Some("An internal error occurred while processing the request."),
                }
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<MxxnError> for ApiError {
    fn from(err: MxxnError) -> Self {
        ApiError::Internal(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.into())
    }
}
