//! Analytics report availability probe.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::services::ApiClient;
use crate::services::metrics::{ArticleMetricsSource, MetricsMap};
use crate::utils::log;

/// Candidate analytics report endpoints, probed in order.
const REPORT_ENDPOINTS: [&str; 3] = [
    "analytics/reports/help_center_articles.json",
    "analytics/reports/help_center_views.json",
    "analytics/reports/help_center_metrics.json",
];

/// Probes the analytics report endpoints for availability.
///
/// The report payload format is account-specific and is not decoded here,
/// so this source always yields an empty mapping and the chain falls
/// through to scraping. It exists to record which report, if any, the
/// account exposes.
pub struct AnalyticsProbe {
    client: Arc<ApiClient>,
}

impl AnalyticsProbe {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticleMetricsSource for AnalyticsProbe {
    fn name(&self) -> &'static str {
        "analytics report probe"
    }

    async fn attempt(&self, _article_ids: &[u64]) -> Result<MetricsMap> {
        for path in REPORT_ENDPOINTS {
            match self.client.get(path, &[]).await {
                Ok(response) if response.status().is_success() => {
                    log::info(&format!(
                        "Analytics report available at {}; payload decoding is not implemented",
                        path
                    ));
                    break;
                }
                Ok(response) => {
                    log::debug(&format!("{}: status {}", path, response.status()));
                }
                Err(error) => {
                    log::debug(&format!("{}: {}", path, error));
                }
            }
        }

        Ok(MetricsMap::new())
    }
}
