//! Best-effort public page scraping source.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::config::MetricsConfig;
use crate::error::Result;
use crate::models::MetricsRecord;
use crate::services::metrics::{ArticleMetricsSource, MetricsMap};
use crate::utils::{article_link, log};

/// View-count patterns tried against the raw page text; first match wins.
///
/// These depend on undocumented page markup and will silently stop matching
/// when the theme changes; keep this source last in the chain.
const VIEW_PATTERNS: [&str; 4] = [
    r"(?i)(\d+)\s*views?",
    r"(?i)views?:\s*(\d+)",
    r"(?i)viewed\s*(\d+)\s*times?",
    r"(?i)(\d+)\s*times?\s*viewed",
];

/// Scrapes view counts from public article pages.
///
/// Uses its own unauthenticated client with a browser-like identifier since
/// this hits the public Help Center, not the API. Capped to the first
/// `scrape_cap` ids and paced generously.
pub struct PageScrape {
    http: reqwest::Client,
    public_base: String,
    cap: usize,
    delay: Duration,
    patterns: Vec<Regex>,
}

impl PageScrape {
    pub fn new(public_base: impl Into<String>, config: &MetricsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.scrape_user_agent)
            .build()?;

        let patterns = VIEW_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Ok(Self {
            http,
            public_base: public_base.into().trim_end_matches('/').to_string(),
            cap: config.scrape_cap,
            delay: Duration::from_millis(config.scrape_delay_ms),
            patterns,
        })
    }

    /// Extract a view count from raw page text; the first matching pattern
    /// wins.
    fn extract_views(&self, html: &str) -> Option<u64> {
        for pattern in &self.patterns {
            if let Some(views) = pattern
                .captures(html)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
            {
                return Some(views);
            }
        }
        None
    }
}

#[async_trait]
impl ArticleMetricsSource for PageScrape {
    fn name(&self) -> &'static str {
        "page scraping"
    }

    async fn attempt(&self, article_ids: &[u64]) -> Result<MetricsMap> {
        let mut metrics = MetricsMap::new();

        for id in article_ids.iter().take(self.cap) {
            let url = article_link(&self.public_base, *id);
            match self.http.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.text().await {
                        Ok(html) => {
                            if let Some(views) = self.extract_views(&html) {
                                log::sub_item(&format!("Found {} views for article {}", views, id));
                                metrics.insert(
                                    *id,
                                    MetricsRecord {
                                        views,
                                        comments: 0,
                                        votes: 0,
                                    },
                                );
                            }
                        }
                        Err(error) => {
                            log::warn(&format!("Error reading article page {}: {}", id, error));
                        }
                    }
                }
                Ok(response) => {
                    log::debug(&format!(
                        "Article page {} not accessible (status {})",
                        id,
                        response.status()
                    ));
                }
                Err(error) => {
                    log::warn(&format!("Error scraping article {}: {}", id, error));
                }
            }

            if self.delay.as_millis() > 0 {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(metrics)
    }
}
