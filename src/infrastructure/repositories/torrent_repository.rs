use crate::domain::feed::{TorrentRecord, UpstreamQuery};
use async_trait::async_trait;

/// Source of torrent records for a feed.
///
/// Implementations absorb every failure (transport, status, decoding) and
/// report it through logs, returning an empty list instead. The feed layer
/// turns an empty list into the "unavailable" placeholder item.
#[async_trait]
pub trait TorrentRepository: Send + Sync {
    async fn fetch(&self, query: &UpstreamQuery) -> Vec<TorrentRecord>;
}
