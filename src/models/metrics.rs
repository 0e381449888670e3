//! Article metrics data structures.

use serde::Deserialize;

/// Per-article engagement counters.
///
/// Exactly one fallback source produces records for a run; an article id
/// with no record is treated as all-zero downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MetricsRecord {
    #[serde(default)]
    pub views: u64,

    #[serde(default)]
    pub comments: u64,

    #[serde(default)]
    pub votes: u64,
}

/// Response of the batch metrics endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchMetricsPage {
    #[serde(default)]
    pub article_metrics: Vec<ArticleMetricEntry>,
}

/// One entry of a batch metrics response.
#[derive(Debug, Deserialize)]
pub struct ArticleMetricEntry {
    pub article_id: u64,

    #[serde(flatten)]
    pub record: MetricsRecord,
}

/// Envelope wrapping a per-article metrics response.
#[derive(Debug, Default, Deserialize)]
pub struct SingleMetricEnvelope {
    #[serde(default)]
    pub article_metric: MetricsRecord,
}
