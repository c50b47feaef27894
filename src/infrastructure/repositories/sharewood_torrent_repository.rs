use super::torrent_repository::TorrentRepository;
use crate::domain::feed::{TorrentRecord, UpstreamQuery};
use crate::infrastructure::config::UpstreamConfig;
use crate::infrastructure::retry::{retry_with_policy, RetryPolicy, Retryable};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("sharewood-rss/", env!("CARGO_PKG_VERSION"));

/// Statuses worth another attempt; everything else fails at once
const RETRYABLE_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("upstream returned HTTP {status}")]
    Status { status: StatusCode },
    #[error("invalid response body: {0}")]
    Decode(reqwest::Error),
    #[error("no usable response within {0:?}, retries included")]
    DeadlineExceeded(Duration),
}

impl Retryable for UpstreamError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Status { status } if RETRYABLE_STATUSES.contains(status))
    }
}

/// Sharewood API client. A single instance is shared by every request so the
/// underlying connection pool is reused.
pub struct SharewoodTorrentRepository {
    http_client: reqwest::Client,
    api_url: String,
    retry_policy: RetryPolicy,
    /// Budget for the whole call, every attempt and backoff included
    deadline: Duration,
}

impl SharewoodTorrentRepository {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .https_only(config.https_only)
            .build()?;

        Ok(Self {
            http_client,
            api_url: format!("{}/api", config.base_url.trim_end_matches('/')),
            retry_policy: RetryPolicy::new(config.max_retries, config.initial_backoff),
            deadline: config.timeout,
        })
    }

    async fn fetch_once(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        attempt: u32,
    ) -> Result<Value, UpstreamError> {
        tracing::debug!(attempt = attempt + 1, "Calling Sharewood API");

        // The URL carries the access key, keep it out of error messages
        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.without_url()))
    }
}

#[async_trait]
impl TorrentRepository for SharewoodTorrentRepository {
    async fn fetch(&self, query: &UpstreamQuery) -> Vec<TorrentRecord> {
        let endpoint = query.action.as_path_segment();
        let url = format!("{}/{}/{}", self.api_url, query.access_key, endpoint);
        let url = url.as_str();
        let params = query.params.as_slice();

        let attempts = retry_with_policy(&self.retry_policy, move |attempt| {
            self.fetch_once(url, params, attempt)
        });

        let result = match tokio::time::timeout(self.deadline, attempts).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::DeadlineExceeded(self.deadline)),
        };

        match result {
            Ok(body) => decode_records(body),
            Err(e) => {
                tracing::error!(error = %e, endpoint = endpoint, "Sharewood API call failed");
                Vec::new()
            }
        }
    }
}

/// Anything but a JSON array counts as an empty result. Elements that do not
/// decode are skipped one by one.
pub fn decode_records(body: Value) -> Vec<TorrentRecord> {
    let Value::Array(elements) = body else {
        tracing::warn!("Sharewood API did not return a list, treating as empty");
        return Vec::new();
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index = index, error = %e, "Skipping malformed torrent record");
                None
            }
        })
        .collect()
}
