use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use pinhole_core::{ResolveError, StoreError};
use thiserror::Error;
use tracing::{error, warn};

use crate::accept::ReplyFormat;
use crate::model::ErrorResponse;
use crate::pages;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid URL provided. Ensure it includes http:// or https://")]
    InvalidUrl(String),

    #[error("The requested resource was not found.")]
    NotFound,

    #[error("Service Unavailable: Database connection failed")]
    StoreUnavailable(#[source] StoreError),

    #[error("Failed to generate short URL after {attempts} attempts. Please try again.")]
    AllocationExhausted { attempts: u32 },

    #[error("Something went wrong on our end.")]
    Internal(String),
}

impl From<ResolveError> for AppError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::InvalidUrl(reason) => AppError::InvalidUrl(reason),
            ResolveError::StoreUnavailable(source) => AppError::StoreUnavailable(source),
            ResolveError::AllocationExhausted { attempts } => {
                AppError::AllocationExhausted { attempts }
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AllocationExhausted { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short error title carried in the `error` field of JSON bodies.
    pub fn title(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::SERVICE_UNAVAILABLE => "Service Unavailable",
            _ => "Internal Server Error",
        }
    }

    /// Renders the error for a browser-facing route.
    ///
    /// `404` and `500` follow `format`; a store outage is always the HTML
    /// outage page; client errors stay JSON.
    pub fn into_page(self, format: ReplyFormat) -> Response {
        self.log();
        let status = self.status_code();

        match (&self, format) {
            (Self::StoreUnavailable(_), _) => {
                (status, Html(pages::SERVICE_UNAVAILABLE)).into_response()
            }
            (Self::BadRequest(_) | Self::InvalidUrl(_), _) | (_, ReplyFormat::Json) => {
                self.json_response()
            }
            (Self::NotFound, ReplyFormat::Html) => {
                (status, Html(pages::NOT_FOUND)).into_response()
            }
            (_, ReplyFormat::Html) => (status, Html(pages::INTERNAL_ERROR)).into_response(),
        }
    }

    fn json_response(&self) -> Response {
        let body = ErrorResponse {
            error: self.title().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }

    fn log(&self) {
        match self {
            Self::StoreUnavailable(source) => warn!(error = %source, "Store unavailable"),
            Self::AllocationExhausted { attempts } => {
                error!(attempts, "Short code allocation exhausted")
            }
            Self::Internal(reason) => error!(reason = %reason, "Internal error"),
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        self.json_response()
    }
}
