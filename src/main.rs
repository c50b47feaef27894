use sharewood_rss::controllers::rss::RssController;
use sharewood_rss::domain::feed::FeedService;
use sharewood_rss::infrastructure::config::{CategoryTitles, Config, LogFormat};
use sharewood_rss::infrastructure::http::start_http_server;
use sharewood_rss::infrastructure::repositories::SharewoodTorrentRepository;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Sharewood RSS on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        base_url = %config.upstream.base_url,
        connect_timeout_secs = config.upstream.connect_timeout.as_secs(),
        timeout_secs = config.upstream.timeout.as_secs(),
        max_retries = config.upstream.max_retries,
        "Upstream configuration loaded"
    );

    let category_titles = Arc::new(CategoryTitles::load(&config.categories_file)?);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Upstream repository (owns the shared connection pool)
    let torrent_repo = Arc::new(SharewoodTorrentRepository::new(&config.upstream)?);

    // 2. Services
    let feed_service = Arc::new(FeedService::new(
        torrent_repo,
        category_titles,
        config.upstream.base_url.clone(),
    ));

    // 3. Controllers
    let rss_controller = Arc::new(RssController::new(feed_service));

    start_http_server(config, rss_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sharewood_rss=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
