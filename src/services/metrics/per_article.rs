//! Per-article metrics endpoint source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::MetricsConfig;
use crate::error::Result;
use crate::models::SingleMetricEnvelope;
use crate::services::ApiClient;
use crate::services::metrics::{ArticleMetricsSource, MetricsMap};
use crate::utils::log;

/// Fetches counters one article at a time.
///
/// Capped at the first `per_article_cap` ids to bound request volume. A
/// non-2xx answer for one id leaves that id out of the result; the loop
/// keeps going.
pub struct PerArticleMetrics {
    client: Arc<ApiClient>,
    cap: usize,
    delay: Duration,
}

impl PerArticleMetrics {
    pub fn new(client: Arc<ApiClient>, config: &MetricsConfig) -> Self {
        Self {
            client,
            cap: config.per_article_cap,
            delay: Duration::from_millis(config.per_article_delay_ms),
        }
    }
}

#[async_trait]
impl ArticleMetricsSource for PerArticleMetrics {
    fn name(&self) -> &'static str {
        "per-article metrics API"
    }

    async fn attempt(&self, article_ids: &[u64]) -> Result<MetricsMap> {
        let mut metrics = MetricsMap::new();

        for id in article_ids.iter().take(self.cap) {
            let path = format!("help_center/articles/{}/metrics.json", id);
            match self.client.get(&path, &[]).await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<SingleMetricEnvelope>().await {
                        Ok(envelope) => {
                            metrics.insert(*id, envelope.article_metric);
                        }
                        Err(error) => {
                            log::warn(&format!("Bad metrics payload for article {}: {}", id, error));
                        }
                    }
                }
                Ok(response) => {
                    log::debug(&format!(
                        "No metrics for article {} (status {})",
                        id,
                        response.status()
                    ));
                }
                Err(error) => {
                    log::warn(&format!("Metrics request for article {} failed: {}", id, error));
                }
            }

            if self.delay.as_millis() > 0 {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(metrics)
    }
}
