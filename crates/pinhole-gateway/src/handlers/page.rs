use crate::accept::ReplyFormat;
use crate::error::AppError;
use crate::pages;
use axum::response::{Html, Response};

pub async fn index_handler() -> Html<&'static str> {
    Html(pages::INDEX)
}

pub async fn not_found_handler(format: ReplyFormat) -> Response {
    AppError::NotFound.into_page(format)
}
