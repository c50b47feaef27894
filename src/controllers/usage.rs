use axum::response::Html;

const USAGE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Sharewood RSS</title>
  <meta charset="UTF-8">
</head>
<body>
  <h1>Sharewood RSS</h1>
  <p>Replace <code>YOUR_PASSKEY</code> with your 32 character Sharewood passkey.</p>
  <strong>Examples:</strong>
  <ul>
    <li><code>/rss/YOUR_PASSKEY/last-torrents?category=1&amp;limit=10</code></li>
    <li><code>/rss/YOUR_PASSKEY/last-torrents?subcategory=9&amp;limit=10</code></li>
    <li><code>/rss/YOUR_PASSKEY/search?name=watchmen&amp;subcategory=9&amp;limit=10</code></li>
  </ul>
  <p>Parameters: <code>category</code> (1-7), <code>subcategory</code> (9-36),
  <code>limit</code> (default 50, at most 100), <code>name</code> (required for search, 100 characters max).</p>
</body>
</html>"#;

/// GET / - How to build a feed URL
pub async fn usage() -> Html<&'static str> {
    Html(USAGE_PAGE)
}
