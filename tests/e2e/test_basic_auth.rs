use crate::e2e::helpers;

use helpers::assertions::{assert_valid_channel, parse_rss};
use helpers::{feed_path, TestContext, TestOptions, AUTH_PASSWORD, AUTH_USERNAME};
use hyper::StatusCode;
use test_context::test_context;

async fn protected_context() -> TestContext {
    TestContext::start(TestOptions {
        basic_auth: true,
        ..Default::default()
    })
    .await
}

#[tokio::test]
async fn it_should_challenge_requests_without_credentials() {
    let ctx = protected_context().await;

    let response = ctx
        .client
        .get(&feed_path("last-torrents", ""))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_header(
            "www-authenticate",
            "Basic realm=\"sharewood-rss\", charset=\"UTF-8\"",
        );
    assert_eq!(ctx.upstream.call_count(), 0);
}

#[tokio::test]
async fn it_should_reject_wrong_credentials() {
    let ctx = protected_context().await;
    let path = feed_path("last-torrents", "");

    for (username, password) in [
        (AUTH_USERNAME, "wrong"),
        ("someone", AUTH_PASSWORD),
        ("", ""),
    ] {
        let response = ctx
            .client
            .get_with_basic_auth(&path, username, password)
            .await
            .unwrap();
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    assert_eq!(ctx.upstream.call_count(), 0);
}

#[tokio::test]
async fn it_should_reject_other_authorization_schemes() {
    let ctx = protected_context().await;
    let path = feed_path("last-torrents", "");

    for authorization in ["Bearer some-token", "Basic !!not-base64!!", "Basic"] {
        let response = ctx
            .client
            .get_with_authorization(&path, authorization)
            .await
            .unwrap();
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn it_should_serve_feed_with_valid_credentials() {
    let ctx = protected_context().await;

    let response = ctx
        .client
        .get_with_basic_auth(
            &feed_path("last-torrents", "category=1"),
            AUTH_USERNAME,
            AUTH_PASSWORD,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let rss = parse_rss(&response.text());
    assert_valid_channel(&rss);
    assert_eq!(ctx.upstream.call_count(), 1);
}

#[tokio::test]
async fn it_should_protect_usage_page() {
    let ctx = protected_context().await;

    ctx.client
        .get("/")
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.client
        .get_with_basic_auth("/", AUTH_USERNAME, AUTH_PASSWORD)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_keep_health_check_open() {
    let ctx = protected_context().await;

    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_require_credentials_when_auth_is_disabled(ctx: &TestContext) {
    ctx.client
        .get(&feed_path("last-torrents", ""))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}
