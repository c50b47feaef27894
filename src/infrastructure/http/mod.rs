use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod rss_response;

pub use rss_response::RssResponse;

use crate::infrastructure::config::{BasicAuthCredentials, Config};
use crate::{
    controllers::{health, rss::RssController, usage},
    infrastructure::auth::{basic_auth_middleware, request_id_middleware},
};

/// Build the application routes.
///
/// `/health` always stays reachable for liveness probes; the usage page and
/// the feeds sit behind Basic Auth when credentials are given.
pub fn build_router(
    rss_controller: Arc<RssController>,
    basic_auth: Option<Arc<BasicAuthCredentials>>,
) -> Router {
    let mut feed_routes = Router::new()
        .route("/", get(usage::usage))
        .route("/rss/:access_key/:action", get(RssController::get_feed))
        .with_state(rss_controller);

    if let Some(credentials) = basic_auth {
        feed_routes = feed_routes.layer(middleware::from_fn_with_state(
            credentials,
            basic_auth_middleware,
        ));
    }

    Router::new()
        .route("/health", get(health::health))
        .merge(feed_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    rss_controller: Arc<RssController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let basic_auth = config.basic_auth.clone().map(Arc::new);
    if basic_auth.is_some() {
        tracing::info!("Basic Auth enabled");
    }

    let app = build_router(rss_controller, basic_auth);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
