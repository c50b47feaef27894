use std::env;
use std::time::Duration;

pub mod categories;

pub use categories::CategoryTitles;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub upstream: UpstreamConfig,
    pub categories_file: String,
    pub basic_auth: Option<BasicAuthCredentials>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// Site root; the API lives under `{base_url}/api`
    pub base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub https_only: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.sharewood.tv".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            https_only: true,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of logs
impl std::fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = UpstreamConfig::default();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "14000".to_string())
                .parse()?,
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
            upstream: UpstreamConfig {
                base_url: env::var("SHAREWOOD_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.base_url),
                connect_timeout: env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .map(|v| v.parse::<u64>().map(Duration::from_secs))
                    .transpose()?
                    .unwrap_or(defaults.connect_timeout),
                timeout: env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .map(|v| v.parse::<u64>().map(Duration::from_secs))
                    .transpose()?
                    .unwrap_or(defaults.timeout),
                max_retries: env::var("UPSTREAM_MAX_RETRIES")
                    .ok()
                    .map(|v| v.parse::<u32>())
                    .transpose()?
                    .unwrap_or(defaults.max_retries),
                initial_backoff: env::var("UPSTREAM_BACKOFF_MS")
                    .ok()
                    .map(|v| v.parse::<u64>().map(Duration::from_millis))
                    .transpose()?
                    .unwrap_or(defaults.initial_backoff),
                https_only: env::var("UPSTREAM_HTTPS_ONLY")
                    .map(|s| s.to_lowercase() != "false")
                    .unwrap_or(defaults.https_only),
            },
            categories_file: env::var("CATEGORIES_FILE")
                .unwrap_or_else(|_| "categories.toml".to_string()),
            basic_auth: basic_auth_from(
                env::var("BASIC_AUTH_USERNAME").ok(),
                env::var("BASIC_AUTH_PASSWORD").ok(),
            ),
        };

        Ok(config)
    }
}

/// The gate is only enabled when both values are set and non-empty
fn basic_auth_from(
    username: Option<String>,
    password: Option<String>,
) -> Option<BasicAuthCredentials> {
    match (username, password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Some(BasicAuthCredentials { username, password })
        }
        _ => None,
    }
}
