use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use super::model::{
    Channel, Enclosure, FeedItem, Guid, RenderedFeed, ResolvedTorrent, TorrentRecord,
};

pub const UNAVAILABLE_TITLE: &str = "Sharewood unavailable";
pub const BITTORRENT_MIME_TYPE: &str = "application/x-bittorrent";
pub const CHANNEL_DESCRIPTION: &str = "Sharewood RSS feed";
pub const CHANNEL_LANGUAGE: &str = "fr";
/// Minutes aggregators should wait between polls
pub const CHANNEL_TTL: u32 = 60;

/// Per-request inputs of the renderer besides the records themselves
#[derive(Debug, Clone)]
pub struct ChannelContext<'a> {
    pub title: String,
    pub site_url: &'a str,
    pub access_key: &'a str,
}

/// Builds the feed for `records`. `now` is the only source of time, so the
/// output is fully determined by the arguments.
pub fn render_feed(
    context: &ChannelContext<'_>,
    records: &[TorrentRecord],
    now: DateTime<Utc>,
) -> RenderedFeed {
    let site_url = context.site_url.trim_end_matches('/');

    let items = if records.is_empty() {
        vec![unavailable_item(now)]
    } else {
        records
            .iter()
            .map(|record| torrent_item(&record.resolve(), site_url, context.access_key, now))
            .collect()
    };

    RenderedFeed {
        channel: Channel {
            title: context.title.clone(),
            description: CHANNEL_DESCRIPTION.to_string(),
            link: site_url.to_string(),
            language: CHANNEL_LANGUAGE.to_string(),
            generator: concat!("sharewood-rss ", env!("CARGO_PKG_VERSION")).to_string(),
            build_date: now,
            ttl: CHANNEL_TTL,
        },
        items,
    }
}

pub fn torrent_page_url(site_url: &str, torrent: &ResolvedTorrent) -> String {
    format!("{}/torrents/{}.{}", site_url, torrent.slug, torrent.id)
}

pub fn torrent_download_url(site_url: &str, access_key: &str, torrent: &ResolvedTorrent) -> String {
    format!("{}/api/{}/{}/download", site_url, access_key, torrent.id)
}

fn torrent_item(
    torrent: &ResolvedTorrent,
    site_url: &str,
    access_key: &str,
    now: DateTime<Utc>,
) -> FeedItem {
    let page_url = torrent_page_url(site_url, torrent);

    let description = format!(
        "<strong><a href='{link}'>{name}</a></strong><br/>\
         Size: {size}<br/>\
         Seeders: {seeders} | Leechers: {leechers}<br/>\
         Added: {created_at}",
        link = escape(page_url.as_str()),
        name = escape(torrent.name.as_str()),
        size = escape(torrent.size_label.as_str()),
        seeders = torrent.seeders,
        leechers = torrent.leechers,
        created_at = escape(torrent.created_at.as_str()),
    );

    FeedItem {
        title: torrent.name.clone(),
        guid: Guid {
            value: format!("{}-{}", torrent.id, torrent.created_at),
            is_permalink: false,
        },
        pub_date: torrent.published_at.unwrap_or(now),
        description,
        enclosure: Some(Enclosure {
            url: torrent_download_url(site_url, access_key, torrent),
            length: torrent.size_bytes.unwrap_or(0),
            mime_type: BITTORRENT_MIME_TYPE.to_string(),
        }),
        link: Some(page_url),
    }
}

/// Placeholder keeping feed readers from flagging an empty or broken feed
fn unavailable_item(now: DateTime<Utc>) -> FeedItem {
    FeedItem {
        title: UNAVAILABLE_TITLE.to_string(),
        link: None,
        guid: Guid {
            value: format!("sharewood-unavailable-{}", now.timestamp()),
            is_permalink: false,
        },
        pub_date: now,
        description: "Sharewood returned no results. This is probably a temporary issue, \
                      the feed will refresh on the next poll."
            .to_string(),
        enclosure: None,
    }
}
