//! Integration tests driving the pipeline against a mock API server.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zdexport::config::{Config, Credentials};
use zdexport::pipeline::export_with;
use zdexport::services::metrics::build_default_chain;
use zdexport::services::{ApiClient, ArticleFetcher, UserResolver};

/// Behavior config with pacing disabled so tests run fast.
fn test_config() -> Config {
    let mut config = Config::default();
    config.api.request_delay_ms = 0;
    config.users.request_delay_ms = 0;
    config.metrics.per_article_delay_ms = 0;
    config.metrics.scrape_delay_ms = 0;
    config
}

fn test_credentials() -> Credentials {
    Credentials {
        subdomain: "acme".to_string(),
        email: "agent@acme.test".to_string(),
        api_token: "token123".to_string(),
    }
}

fn api_client(config: &Config, server: &MockServer) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::with_base_url(
            &config.api,
            &test_credentials(),
            format!("{}/api/v2", server.uri()),
        )
        .unwrap(),
    )
}

fn article_json(id: u64, author_id: Option<u64>, embedded_name: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": format!("Article {}", id),
        "author_id": author_id,
        "draft": false,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-02-01T00:00:00Z",
        "user": author_id.and_then(|aid| {
            embedded_name.map(|name| json!({ "id": aid, "name": name }))
        }),
    })
}

fn article_page(ids: std::ops::RangeInclusive<u64>) -> Value {
    let articles: Vec<Value> = ids.map(|id| article_json(id, None, None)).collect();
    json!({ "articles": articles })
}

async fn mount_listing_page(server: &MockServer, page: u32, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles.json"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn paginator_requests_follow_up_page_after_full_pages() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, article_page(1..=100), 1).await;
    mount_listing_page(&server, 2, article_page(101..=200), 1).await;
    mount_listing_page(&server, 3, json!({ "articles": [] }), 1).await;

    let config = test_config();
    let fetcher = ArticleFetcher::new(api_client(&config, &server), &config.api);
    let articles = fetcher.fetch_all().await;

    assert_eq!(articles.len(), 200);
    // Items arrive in request order
    assert_eq!(articles[0].id, 1);
    assert_eq!(articles[199].id, 200);
}

#[tokio::test]
async fn paginator_stops_on_short_page() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, article_page(1..=100), 1).await;
    mount_listing_page(&server, 2, article_page(101..=150), 1).await;
    // No page 3 mock: a request for it would fail the expectations below.

    let config = test_config();
    let fetcher = ArticleFetcher::new(api_client(&config, &server), &config.api);
    let articles = fetcher.fetch_all().await;

    assert_eq!(articles.len(), 150);
}

#[tokio::test]
async fn paginator_keeps_partial_results_on_mid_run_failure() {
    let server = MockServer::start().await;
    mount_listing_page(&server, 1, article_page(1..=100), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = ArticleFetcher::new(api_client(&config, &server), &config.api);
    let articles = fetcher.fetch_all().await;

    assert_eq!(articles.len(), 100);
}

#[tokio::test]
async fn direct_fetch_looks_up_each_distinct_author_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/11.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 11, "name": "Alice", "email": "alice@acme.test" },
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/12.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 12, "name": "Bob" },
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/13.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let articles: Vec<zdexport::models::Article> = [11, 11, 12, 13, 11]
        .iter()
        .enumerate()
        .map(|(i, author)| {
            serde_json::from_value(article_json(i as u64 + 1, Some(*author), None)).unwrap()
        })
        .collect();

    let config = test_config();
    let client = api_client(&config, &server);
    let resolver = UserResolver::fetch_direct(&client, &articles, &config.users).await;

    assert_eq!(resolver.len(), 3);
    assert_eq!(resolver.resolve(Some(11)).name, "Alice");
    assert_eq!(
        resolver.resolve(Some(11)).email.as_deref(),
        Some("alice@acme.test")
    );
    // Failed lookup still cached as a placeholder
    assert_eq!(resolver.resolve(Some(13)).name, "Unknown Author (ID: 13)");
}

#[tokio::test]
async fn batch_metrics_success_suppresses_fallback_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/metrics.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "article_metrics": [
                { "article_id": 1, "views": 120, "comments": 4, "votes": 2 },
                { "article_id": 2, "views": 15 },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v2/help_center/articles/\d+/metrics\.json$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/hc/en-us/articles/\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config();
    let client = api_client(&config, &server);
    let chain = build_default_chain(client, &server.uri(), &config.metrics).unwrap();

    let metrics = chain.resolve(&[1, 2, 3]).await;
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[&1].views, 120);
    assert_eq!(metrics[&2].comments, 0);
}

#[tokio::test]
async fn empty_batch_falls_back_to_per_article_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/metrics.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "article_metrics": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    for id in 1..=3u64 {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/help_center/articles/{}/metrics.json", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "article_metric": { "views": id * 10 },
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = test_config();
    let client = api_client(&config, &server);
    let chain = build_default_chain(client, &server.uri(), &config.metrics).unwrap();

    let metrics = chain.resolve(&[1, 2, 3]).await;
    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics[&3].views, 30);
}

#[tokio::test]
async fn per_article_skips_failing_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/metrics.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/1/metrics.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/2/metrics.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "article_metric": { "views": 55 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let client = api_client(&config, &server);
    let chain = build_default_chain(client, &server.uri(), &config.metrics).unwrap();

    let metrics = chain.resolve(&[1, 2]).await;
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[&2].views, 55);
}

#[tokio::test]
async fn scrape_recovers_views_when_api_sources_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hc/en-us/articles/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><span class=\"meta\">123 views</span></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Every API endpoint (batch, per-article, analytics) and the second
    // article page answer 404.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config();
    let client = api_client(&config, &server);
    let chain = build_default_chain(client, &server.uri(), &config.metrics).unwrap();

    let metrics = chain.resolve(&[1, 2]).await;
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[&1].views, 123);
    assert_eq!(metrics[&1].comments, 0);
}

#[tokio::test]
async fn exhausted_chain_yields_empty_map_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config();
    let client = api_client(&config, &server);
    let chain = build_default_chain(client, &server.uri(), &config.metrics).unwrap();

    assert!(chain.resolve(&[1, 2, 3]).await.is_empty());
}

#[tokio::test]
async fn end_to_end_export_writes_one_row_per_article() {
    let server = MockServer::start().await;

    // Startup connectivity probe
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles.json"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": [article_json(1, Some(11), Some("Alice"))],
        })))
        .expect(1)
        .mount(&server)
        .await;

    // 150 articles over two pages; authors 11 and 12 embedded, 13 not
    let page1: Vec<Value> = (1..=100)
        .map(|id| match id {
            1..=50 => article_json(id, Some(11), Some("Alice")),
            51..=99 => article_json(id, Some(12), Some("Bob")),
            _ => article_json(id, Some(13), None),
        })
        .collect();
    let page2: Vec<Value> = (101..=150)
        .map(|id| article_json(id, Some(13), None))
        .collect();
    mount_listing_page(&server, 1, json!({ "articles": page1 }), 1).await;
    mount_listing_page(&server, 2, json!({ "articles": page2 }), 1).await;

    // Batch metrics cover 140 of the 150 articles
    let entries: Vec<Value> = (1..=140)
        .map(|id| json!({ "article_id": id, "views": 5, "comments": 1, "votes": 0 }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles/metrics.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "article_metrics": entries })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let target: PathBuf = tmp.path().join("export.csv");

    let config = test_config();
    let client = api_client(&config, &server);
    let written = export_with(&config, client, &server.uri(), Some(target.clone()))
        .await
        .unwrap();
    assert_eq!(written, Some(target.clone()));

    let mut reader = csv::Reader::from_path(&target).unwrap();
    let headers = reader.headers().unwrap().clone();
    let views_idx = headers.iter().position(|h| h == "views").unwrap();
    let id_idx = headers.iter().position(|h| h == "article_id").unwrap();
    let author_idx = headers
        .iter()
        .position(|h| h == "article_author_name")
        .unwrap();

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 150);

    let zero_view_rows: Vec<&csv::StringRecord> = rows
        .iter()
        .filter(|row| row.get(views_idx) == Some("0"))
        .collect();
    assert_eq!(zero_view_rows.len(), 10);
    for row in &zero_view_rows {
        let id: u64 = row.get(id_idx).unwrap().parse().unwrap();
        assert!(id > 140);
    }

    // Author 13 never had an embedded summary: placeholder name, row kept
    let unknown_row = rows
        .iter()
        .find(|row| row.get(id_idx) == Some("150"))
        .unwrap();
    assert_eq!(unknown_row.get(author_idx), Some("Unknown Author"));
}

#[tokio::test]
async fn export_without_articles_writes_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/help_center/articles.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "articles": [] })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("export.csv");

    let config = test_config();
    let client = api_client(&config, &server);
    let written = export_with(&config, client, &server.uri(), Some(target.clone()))
        .await
        .unwrap();

    assert_eq!(written, None);
    assert!(!target.exists());
}

#[tokio::test]
async fn export_fails_fast_when_connectivity_check_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = test_config();
    let client = api_client(&config, &server);
    let result = export_with(&config, client, &server.uri(), None).await;

    assert!(result.is_err());
}
