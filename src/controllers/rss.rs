use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use std::sync::Arc;

use crate::{
    domain::feed::{FeedQuery, FeedRequest, FeedService, FeedServiceApi},
    error::{AppError, AppResult},
    infrastructure::http::RssResponse,
};

pub struct RssController {
    feed_service: Arc<FeedService>,
}

impl RssController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /rss/:access_key/:action - RSS feed of the latest torrents or of a search
    ///
    /// Query params: `category`, `subcategory`, `limit`, `name`
    pub async fn get_feed(
        State(controller): State<Arc<RssController>>,
        path: Result<Path<(String, String)>, PathRejection>,
        query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    ) -> AppResult<RssResponse> {
        // An undecodable key is just another malformed key
        let Path((access_key, action)) = path.map_err(|e| {
            tracing::debug!(error = %e, "Unreadable feed path");
            AppError::NotFound("Unknown feed".to_string())
        })?;
        let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

        let request = FeedRequest::validate(&access_key, &action, FeedQuery::from_pairs(pairs))?;
        let feed = controller.feed_service.build_feed(&request).await;
        RssResponse::from_feed(&feed)
    }
}
