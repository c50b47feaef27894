use axum::{
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::net::SocketAddr;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::infrastructure::config::BasicAuthCredentials;

impl BasicAuthCredentials {
    /// Compares both fields in constant time, without short-circuiting on the username
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(username_ok & password_ok)
    }
}

/// HTTP Basic Auth guard, only layered when credentials are configured
pub async fn basic_auth_middleware(
    State(credentials): State<Arc<BasicAuthCredentials>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_authorization);

    match provided {
        Some((username, password)) if credentials.matches(&username, &password) => {
            Ok(next.run(request).await)
        }
        Some(_) => {
            tracing::warn!(peer = %peer_address(&request), "Rejected invalid Basic Auth credentials");
            Err(AppError::Unauthorized("Invalid credentials".to_string()))
        }
        None => {
            tracing::info!(peer = %peer_address(&request), "Request without Basic Auth credentials");
            Err(AppError::Unauthorized("Missing credentials".to_string()))
        }
    }
}

/// Splits `Basic base64(user:password)` into its two parts
pub fn parse_basic_authorization(header_value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

fn peer_address(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
