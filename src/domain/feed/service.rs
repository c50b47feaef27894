use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::model::{FeedAction, FeedRequest, RenderedFeed};
use super::render::{render_feed, ChannelContext};
use crate::infrastructure::config::CategoryTitles;
use crate::infrastructure::repositories::TorrentRepository;

pub struct FeedService {
    torrent_repo: Arc<dyn TorrentRepository>,
    category_titles: Arc<CategoryTitles>,
    site_url: String,
}

impl FeedService {
    pub fn new(
        torrent_repo: Arc<dyn TorrentRepository>,
        category_titles: Arc<CategoryTitles>,
        site_url: String,
    ) -> Self {
        Self {
            torrent_repo,
            category_titles,
            site_url,
        }
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    /// Fetch the records matching `request` and render them.
    ///
    /// Never fails: an unreachable upstream yields the placeholder feed.
    async fn build_feed(&self, request: &FeedRequest) -> RenderedFeed;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn build_feed(&self, request: &FeedRequest) -> RenderedFeed {
        let records = self.torrent_repo.fetch(&request.upstream_query()).await;

        tracing::debug!(
            action = request.action.as_path_segment(),
            records = records.len(),
            "Rendering feed"
        );

        let context = ChannelContext {
            title: self.channel_title(request),
            site_url: &self.site_url,
            access_key: &request.access_key,
        };

        render_feed(&context, &records, self.now())
    }
}

impl FeedService {
    fn channel_title(&self, request: &FeedRequest) -> String {
        match (request.action, &request.name) {
            (FeedAction::Search, Some(name)) => format!("Search: {}", name),
            _ => self
                .category_titles
                .title_for(request.title_key().as_deref())
                .to_string(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
