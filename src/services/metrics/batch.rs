//! Bulk metrics endpoint source.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::BatchMetricsPage;
use crate::services::ApiClient;
use crate::services::metrics::{ArticleMetricsSource, MetricsMap};

/// Fetches counters for all articles with a single request.
///
/// Preferred source: one request regardless of article count. Restricted
/// accounts answer with a non-2xx status, which surfaces as an error and
/// moves the chain along.
pub struct BatchMetrics {
    client: Arc<ApiClient>,
}

impl BatchMetrics {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticleMetricsSource for BatchMetrics {
    fn name(&self) -> &'static str {
        "batch metrics API"
    }

    async fn attempt(&self, article_ids: &[u64]) -> Result<MetricsMap> {
        let joined = article_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let page: BatchMetricsPage = self
            .client
            .get_json(
                "help_center/articles/metrics.json",
                &[("article_ids", joined)],
            )
            .await?;

        Ok(page
            .article_metrics
            .into_iter()
            .map(|entry| (entry.article_id, entry.record))
            .collect())
    }
}
