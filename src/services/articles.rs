// src/services/articles.rs

//! Paginated article listing.
//!
//! Walks the listing endpoint page by page until a short or empty page
//! signals end-of-data, pacing requests to respect server-side rate limits.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{Article, ArticlePage};
use crate::services::ApiClient;
use crate::utils::log;

/// Listing page size; the platform's documented maximum.
pub const PER_PAGE: usize = 100;

/// Service fetching every article from the listing endpoint.
pub struct ArticleFetcher {
    client: Arc<ApiClient>,
    delay: Duration,
}

impl ArticleFetcher {
    /// Create a new fetcher with the given client and pacing configuration.
    pub fn new(client: Arc<ApiClient>, config: &ApiConfig) -> Self {
        Self {
            client,
            delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    /// Fetch all articles across pages.
    ///
    /// A short page is treated as the final page. A failure mid-pagination
    /// stops the walk and returns whatever was accumulated; partial results
    /// are acceptable and the run continues.
    pub async fn fetch_all(&self) -> Vec<Article> {
        let mut articles = Vec::new();
        let mut page = 1u32;

        log::info("Fetching articles...");

        loop {
            let batch = match self.fetch_page(page).await {
                Ok(batch) => batch,
                Err(error) => {
                    log::warn(&format!("Error fetching articles on page {}: {}", page, error));
                    break;
                }
            };

            if batch.is_empty() {
                break;
            }

            let count = batch.len();
            articles.extend(batch);
            log::sub_item(&format!("Retrieved {} articles (page {})", count, page));

            if count < PER_PAGE {
                break;
            }
            page += 1;

            if self.delay.as_millis() > 0 {
                tokio::time::sleep(self.delay).await;
            }
        }

        log::success(&format!("Total articles retrieved: {}", articles.len()));
        articles
    }

    /// Fetch a single listing page, asking the server to embed author
    /// summaries for the cache-priming path.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Article>> {
        let response: ArticlePage = self
            .client
            .get_json(
                "help_center/articles.json",
                &[
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                    ("include", "users".to_string()),
                ],
            )
            .await?;
        Ok(response.articles)
    }
}
