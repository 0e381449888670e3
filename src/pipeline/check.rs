// src/pipeline/check.rs

//! Connectivity and credential diagnostics.
//!
//! Meant to be run before a first export: verifies API access, reports
//! whether the metrics endpoint answers for this account, and prints the
//! authenticated identity. Only the initial API probe is fatal.

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::models::ArticlePage;
use crate::services::ApiClient;
use crate::utils::log;

/// Run the connection check against the account's standard endpoints.
pub async fn run_check(config: &Config, credentials: &Credentials) -> Result<()> {
    log::header("Zendesk API Connection Check");
    log::info(&format!("Target: {}.zendesk.com", credentials.subdomain));

    let client = ApiClient::new(&config.api, credentials)?;
    check_with(&client).await
}

/// Run the diagnostics with an already-built client.
pub async fn check_with(client: &ApiClient) -> Result<()> {
    let page: ArticlePage = client
        .get_json(
            "help_center/articles.json",
            &[("per_page", "1".to_string())],
        )
        .await?;
    log::success("API connection successful");

    match page.articles.first() {
        Some(article) => {
            log::sub_item(&format!(
                "Sample article: '{}' (ID: {})",
                article.title, article.id
            ));

            match client
                .get(
                    "help_center/articles/metrics.json",
                    &[("article_ids", article.id.to_string())],
                )
                .await
            {
                Ok(response) if response.status().is_success() => {
                    log::success("Metrics API access successful");
                }
                Ok(response) => {
                    log::warn(&format!(
                        "Metrics API returned status {} (normal for some plans)",
                        response.status()
                    ));
                }
                Err(error) => {
                    log::warn(&format!("Metrics API check failed: {}", error));
                }
            }
        }
        None => log::warn("No articles found in the knowledge base"),
    }

    match client.current_user().await {
        Ok(user) => {
            let email = user.email.unwrap_or_else(|| "no email".to_string());
            log::success(&format!("Authenticated as: {} ({})", user.name, email));
        }
        Err(error) => {
            log::warn(&format!("Could not retrieve identity: {}", error));
        }
    }

    Ok(())
}
