use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Representation chosen for error pages, derived from the `Accept` header.
///
/// JSON is only chosen when the client accepts JSON and does not accept
/// HTML. Browsers (which send `text/html` or `*/*`) and clients without an
/// `Accept` header get HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Html,
    Json,
}

impl ReplyFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
            return Self::Html;
        };

        let json = accepts(accept, "application/json");
        let html = accepts(accept, "text/html") || accepts(accept, "application/xhtml+xml");

        if json && !html {
            Self::Json
        } else {
            Self::Html
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ReplyFormat {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Whether any media range of `accept` with a non-zero quality matches
/// `wanted`, honouring `*/*` and `type/*` wildcards.
fn accepts(accept: &str, wanted: &str) -> bool {
    let Some((wanted_type, _)) = wanted.split_once('/') else {
        return false;
    };

    accept
        .split(',')
        .filter_map(|range| {
            let mut params = range.split(';');
            let media = params.next()?.trim();
            let quality = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some(media)
        })
        .any(|media| {
            media == "*/*"
                || media.eq_ignore_ascii_case(wanted)
                || media
                    .strip_suffix("/*")
                    .is_some_and(|ty| ty.eq_ignore_ascii_case(wanted_type))
        })
}
