use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use super::size::format_size;

/// Hard ceiling on the number of records requested upstream
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_NAME_LENGTH: usize = 100;
pub const ACCESS_KEY_LENGTH: usize = 32;

/// Timestamp layout used by the upstream API for `created_at`, always UTC
pub const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_NAME: &str = "Unnamed";
const DEFAULT_SLUG: &str = "torrent";

/// Route action, mirrored 1:1 on the upstream endpoint name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAction {
    LastTorrents,
    Search,
}

impl FeedAction {
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "last-torrents" => Some(Self::LastTorrents),
            "search" => Some(Self::Search),
            _ => None,
        }
    }

    pub fn as_path_segment(&self) -> &'static str {
        match self {
            Self::LastTorrents => "last-torrents",
            Self::Search => "search",
        }
    }
}

/// A validated feed request. Only built by `FeedRequest::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub access_key: String,
    pub action: FeedAction,
    pub category: Option<u8>,
    pub subcategory: Option<u8>,
    pub limit: u32,
    pub name: Option<String>,
}

impl FeedRequest {
    /// Identifier used for the channel title lookup; the subcategory wins over the category.
    pub fn title_key(&self) -> Option<String> {
        self.subcategory
            .or(self.category)
            .map(|id| id.to_string())
    }

    pub fn upstream_query(&self) -> UpstreamQuery {
        let mut params = Vec::with_capacity(4);

        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(subcategory) = self.subcategory {
            params.push(("subcategory", subcategory.to_string()));
        }
        params.push(("limit", self.limit.to_string()));

        // `name` only filters the search endpoint
        if self.action == FeedAction::Search {
            if let Some(name) = &self.name {
                params.push(("name", name.clone()));
            }
        }

        UpstreamQuery {
            access_key: self.access_key.clone(),
            action: self.action,
            params,
        }
    }
}

/// Outgoing call to the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub access_key: String,
    pub action: FeedAction,
    pub params: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Size as sent upstream: a byte count, or a label the site already formatted
#[derive(Debug, Clone, PartialEq)]
pub enum TorrentSize {
    Bytes(u64),
    Fractional(f64),
    Label(String),
}

impl TorrentSize {
    /// `None` for anything that is neither a number nor a string
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(Self::Bytes)
                .or_else(|| n.as_f64().map(Self::Fractional)),
            Value::String(label) => Some(Self::Label(label.clone())),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Bytes(bytes) => Some(*bytes),
            Self::Fractional(bytes) if *bytes >= 0.0 => Some(bytes.round() as u64),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Label(label) => label.clone(),
            other => format_size(other.bytes().unwrap_or(0)),
        }
    }
}

/// One torrent entry from the upstream API. Everything but `id` may be missing
/// or carry an unexpected JSON type; `resolve` coerces or defaults each field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TorrentRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub slug: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub seeders: Option<Value>,
    #[serde(default)]
    pub leechers: Option<Value>,
}

/// A record with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTorrent {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub size_label: String,
    pub size_bytes: Option<u64>,
    pub created_at: String,
    pub published_at: Option<DateTime<Utc>>,
    pub seeders: u64,
    pub leechers: u64,
}

impl TorrentRecord {
    pub fn resolve(&self) -> ResolvedTorrent {
        let created_at = resolve_text(self.created_at.as_ref()).unwrap_or_default();
        let size = self.size.as_ref().and_then(TorrentSize::from_value);

        ResolvedTorrent {
            id: self.id.to_string(),
            name: resolve_name(self.name.as_ref()),
            slug: resolve_text(self.slug.as_ref())
                .filter(|slug| !slug.is_empty())
                .unwrap_or_else(|| DEFAULT_SLUG.to_string()),
            size_label: size
                .as_ref()
                .map(TorrentSize::label)
                .unwrap_or_else(|| format_size(0)),
            size_bytes: size.as_ref().and_then(TorrentSize::bytes),
            published_at: parse_upstream_date(&created_at),
            created_at,
            seeders: resolve_count(self.seeders.as_ref()),
            leechers: resolve_count(self.leechers.as_ref()),
        }
    }
}

pub fn parse_upstream_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), UPSTREAM_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn resolve_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => DEFAULT_NAME.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Strings as-is, other scalars stringified, containers and null dropped
fn resolve_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        _ => None,
    }
}

fn resolve_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// RSS 2.0 document, built fresh for every request
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeed {
    pub channel: Channel,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub generator: String,
    pub build_date: DateTime<Utc>,
    pub ttl: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
    pub guid: Guid,
    pub pub_date: DateTime<Utc>,
    /// HTML, written out as CDATA
    pub description: String,
    pub enclosure: Option<Enclosure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guid {
    pub value: String,
    pub is_permalink: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    pub mime_type: String,
}
