use crate::accept::ReplyFormat;
use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinhole_core::ShortCode;
use tracing::{debug, info};

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected shorten payload");
        AppError::BadRequest("URL is required in JSON payload".to_string())
    })?;

    let long_url = request
        .url
        .ok_or_else(|| AppError::BadRequest("URL is required in JSON payload".to_string()))?;

    let code = state.resolver().resolve(&long_url).await?;
    let short_url = code.to_url(state.base_url());
    info!(code = %code, "Shortened URL");

    Ok(Json(ShortenResponse {
        short_url,
        original_url: long_url,
    }))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    format: ReplyFormat,
) -> Response {
    // A segment that is not a well-formed code was never reserved.
    let Ok(code) = ShortCode::new(code) else {
        return AppError::NotFound.into_page(format);
    };

    match state.resolver().lookup(&code).await {
        Ok(Some(long_url)) => match location(&long_url) {
            Some(location) => {
                debug!(code = %code, "Redirecting");
                (StatusCode::FOUND, [(LOCATION, location)]).into_response()
            }
            None => AppError::Internal(format!("stored URL is not a valid Location: {long_url}"))
                .into_page(format),
        },
        Ok(None) => {
            debug!(code = %code, "Short code not found");
            AppError::NotFound.into_page(format)
        }
        Err(e) => AppError::from(e).into_page(format),
    }
}

/// Builds a `Location` value, percent-encoding the URL first when it holds
/// anything but visible ASCII.
fn location(long_url: &str) -> Option<HeaderValue> {
    if long_url.bytes().all(|b| b.is_ascii_graphic()) {
        return HeaderValue::from_str(long_url).ok();
    }

    let normalized = url::Url::parse(long_url).ok()?;
    HeaderValue::from_str(normalized.as_str()).ok()
}
