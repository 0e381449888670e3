// src/services/metrics/mod.rs

//! Metrics retrieval fallback chain.
//!
//! View/comment/vote counters are not reliably available from any single
//! endpoint: the bulk metrics API is restricted on some plans, the
//! per-article API is rate-limited, and some accounts only expose counts on
//! the public article pages. Sources implementing [`ArticleMetricsSource`]
//! are therefore tried in priority order until one yields a non-empty
//! mapping:
//!
//! 1. [`BatchMetrics`] - one bulk request for all article ids
//! 2. [`PerArticleMetrics`] - capped per-id requests
//! 3. [`AnalyticsProbe`] - analytics report availability probe
//! 4. [`PageScrape`] - best-effort public page scraping
//!
//! A source that fails at the transport level never aborts the chain; the
//! resolver logs the failure and advances. When every source comes back
//! empty the run proceeds with all-zero metrics.

mod analytics;
mod batch;
mod per_article;
mod scrape;

pub use analytics::AnalyticsProbe;
pub use batch::BatchMetrics;
pub use per_article::PerArticleMetrics;
pub use scrape::PageScrape;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MetricsConfig;
use crate::error::Result;
use crate::models::MetricsRecord;
use crate::services::ApiClient;
use crate::utils::log;

/// Resolved metrics keyed by article id.
pub type MetricsMap = HashMap<u64, MetricsRecord>;

/// A single metrics retrieval strategy.
#[async_trait]
pub trait ArticleMetricsSource: Send + Sync {
    /// Human-readable source name used in log output.
    fn name(&self) -> &'static str;

    /// Attempt to retrieve metrics for the given article ids.
    ///
    /// An empty mapping is a valid outcome meaning this source had no data;
    /// the caller then advances to the next source.
    async fn attempt(&self, article_ids: &[u64]) -> Result<MetricsMap>;
}

/// Priority-ordered collection of metrics sources.
pub struct MetricsResolver {
    sources: Vec<Box<dyn ArticleMetricsSource>>,
}

impl MetricsResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source; sources are tried in registration order.
    pub fn register(&mut self, source: Box<dyn ArticleMetricsSource>) {
        self.sources.push(source);
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Resolve metrics for the given article ids.
    ///
    /// Short-circuits on the first source returning a non-empty mapping.
    /// Source faults are absorbed and logged. An empty result from every
    /// source yields an empty mapping, not an error.
    pub async fn resolve(&self, article_ids: &[u64]) -> MetricsMap {
        if article_ids.is_empty() {
            return MetricsMap::new();
        }

        for source in &self.sources {
            match source.attempt(article_ids).await {
                Ok(metrics) if !metrics.is_empty() => {
                    log::success(&format!(
                        "Retrieved metrics for {} articles via {}",
                        metrics.len(),
                        source.name()
                    ));
                    return metrics;
                }
                Ok(_) => {
                    log::info(&format!("No metrics from {}, trying next source", source.name()));
                }
                Err(error) => {
                    log::warn(&format!("{} failed: {}", source.name(), error));
                }
            }
        }

        log::warn("Could not retrieve metrics from any source; views default to 0");
        MetricsMap::new()
    }
}

impl Default for MetricsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the standard source chain in priority order.
pub fn build_default_chain(
    client: Arc<ApiClient>,
    public_base: &str,
    config: &MetricsConfig,
) -> Result<MetricsResolver> {
    let mut resolver = MetricsResolver::new();
    resolver.register(Box::new(BatchMetrics::new(Arc::clone(&client))));
    resolver.register(Box::new(PerArticleMetrics::new(Arc::clone(&client), config)));
    resolver.register(Box::new(AnalyticsProbe::new(client)));
    resolver.register(Box::new(PageScrape::new(public_base, config)?));
    Ok(resolver)
}
