use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::domain::feed::rss::format_rfc822;
use crate::domain::feed::RenderedFeed;
use crate::error::{AppError, AppResult};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Serialized feed plus the headers of a live, never-cached document
#[derive(Debug)]
pub struct RssResponse {
    body: Vec<u8>,
    last_modified: DateTime<Utc>,
}

impl RssResponse {
    pub fn from_feed(feed: &RenderedFeed) -> AppResult<Self> {
        let body = feed
            .to_xml()
            .map_err(|e| AppError::Internal(format!("Failed to serialize feed: {}", e)))?;

        Ok(Self {
            body,
            last_modified: feed.channel.build_date,
        })
    }
}

impl IntoResponse for RssResponse {
    fn into_response(self) -> Response {
        let last_modified = HeaderValue::from_str(&format_rfc822(&self.last_modified))
            .unwrap_or_else(|_| HeaderValue::from_static("0"));

        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(RSS_CONTENT_TYPE)),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate, max-age=0"),
                ),
                (header::PRAGMA, HeaderValue::from_static("no-cache")),
                (header::EXPIRES, HeaderValue::from_static("0")),
                (header::LAST_MODIFIED, last_modified),
            ],
            self.body,
        )
            .into_response()
    }
}
