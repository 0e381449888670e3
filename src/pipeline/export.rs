// src/pipeline/export.rs

//! Article export pipeline.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, Credentials, UserLookupMode};
use crate::error::Result;
use crate::pipeline::assemble;
use crate::services::metrics::build_default_chain;
use crate::services::{ApiClient, ArticleFetcher, UserResolver};
use crate::storage::CsvExporter;
use crate::utils::{log, public_base_url};

/// Run the full export against the account's standard endpoints.
pub async fn run_export(
    config: &Config,
    credentials: &Credentials,
    output: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    log::header("Zendesk Knowledge Base Export");
    log::info(&format!("Target: {}.zendesk.com", credentials.subdomain));

    let client = Arc::new(ApiClient::new(&config.api, credentials)?);
    let public_base = public_base_url(&credentials.subdomain);
    export_with(config, client, &public_base, output).await
}

/// Run the export with an already-built client and public base URL.
///
/// Returns the written file path, or `None` when the listing produced no
/// articles (a valid empty state, not an error).
pub async fn export_with(
    config: &Config,
    client: Arc<ApiClient>,
    public_base: &str,
    output: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    // A dead endpoint or bad credentials should fail the run up front,
    // before any pagination starts.
    client.check_connection().await?;

    let fetcher = ArticleFetcher::new(Arc::clone(&client), &config.api);
    let articles = fetcher.fetch_all().await;

    if articles.is_empty() {
        log::warn("No articles found; nothing to export");
        return Ok(None);
    }

    let users = match config.users.lookup {
        UserLookupMode::Embedded => UserResolver::prime_from_articles(&articles),
        UserLookupMode::Direct => {
            UserResolver::fetch_direct(&client, &articles, &config.users).await
        }
    };

    let article_ids: Vec<u64> = articles.iter().map(|a| a.id).collect();

    log::info("Fetching article metrics...");
    let chain = build_default_chain(Arc::clone(&client), public_base, &config.metrics)?;
    let metrics = chain.resolve(&article_ids).await;

    log::info("Processing articles...");
    let records = assemble(&articles, &users, &metrics, public_base);

    let exporter = CsvExporter::new(config.export.clone());
    let path = exporter.write(&records, output).await?;

    let total_views: u64 = records.iter().map(|r| r.views).sum();
    let with_views = records.iter().filter(|r| r.views > 0).count();
    let unique_authors: HashSet<Option<u64>> = records.iter().map(|r| r.author_id).collect();

    log::summary(
        "Export",
        &[
            ("Total articles", records.len().to_string()),
            ("Total views", total_views.to_string()),
            ("Articles with views", with_views.to_string()),
            ("Unique authors", unique_authors.len().to_string()),
            ("Output file", path.display().to_string()),
        ],
    );
    log::success("Export complete");

    Ok(Some(path))
}
