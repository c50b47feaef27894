use crate::e2e::helpers;

use helpers::assertions::{assert_valid_channel, parse_rss};
use helpers::fake_upstream::FakeReply;
use helpers::{feed_path, TestContext};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_search_by_name(ctx: &TestContext) {
    ctx.upstream.enqueue(FakeReply::Json(json!([{
        "id": 42,
        "name": "Watchmen 2009 MULTi 1080p",
        "slug": "watchmen-2009-multi-1080p",
        "size": 12884901888u64,
        "created_at": "2023-11-05 20:15:00",
        "seeders": 12,
        "leechers": 0
    }])));

    let response = ctx
        .client
        .get(&feed_path("search", "name=watchmen&subcategory=9&limit=10"))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let rss = parse_rss(&response.text());
    assert_valid_channel(&rss);
    assert_eq!(rss.channel["title"], "Search: watchmen");
    assert_eq!(rss.items.len(), 1);
    assert!(rss.items[0]["description"].contains("12 GiB"));

    let calls = ctx.upstream.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].action, "search");
    assert_eq!(calls[0].query.get("name").map(String::as_str), Some("watchmen"));
    assert_eq!(calls[0].query.get("subcategory").map(String::as_str), Some("9"));
    assert_eq!(calls[0].query.get("limit").map(String::as_str), Some("10"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_encode_search_terms(ctx: &TestContext) {
    ctx.client
        .get(&feed_path("search", "name=le%20bon%20%26%20la%20brute"))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let calls = ctx.upstream.calls();
    assert_eq!(
        calls[0].query.get("name").map(String::as_str),
        Some("le bon & la brute")
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_name_for_search(ctx: &TestContext) {
    for query in ["", "name=", "category=1"] {
        let response = ctx.client.get(&feed_path("search", query)).await.unwrap();
        response.assert_status(StatusCode::NOT_FOUND);
    }

    assert_eq!(ctx.upstream.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_names_longer_than_100_characters(ctx: &TestContext) {
    let name = "x".repeat(101);

    for action in ["search", "last-torrents"] {
        let response = ctx
            .client
            .get(&feed_path(action, &format!("name={}", name)))
            .await
            .unwrap();
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(ctx.upstream.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_names_of_exactly_100_characters(ctx: &TestContext) {
    let name = "x".repeat(100);

    ctx.client
        .get(&feed_path("search", &format!("name={}", name)))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let calls = ctx.upstream.calls();
    assert_eq!(calls[0].query.get("name"), Some(&name));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_forward_name_for_last_torrents(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&feed_path("last-torrents", "name=watchmen&category=1"))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let rss = parse_rss(&response.text());
    assert_eq!(rss.channel["title"], "Vidéos");

    let calls = ctx.upstream.calls();
    assert_eq!(calls[0].action, "last-torrents");
    assert!(!calls[0].query.contains_key("name"));
}
