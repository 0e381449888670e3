//! Utility functions and helpers.

pub mod log;

/// Build the REST API base URL for a subdomain.
pub fn api_base_url(subdomain: &str) -> String {
    format!("https://{}.zendesk.com/api/v2", subdomain)
}

/// Build the public Help Center base URL for a subdomain.
pub fn public_base_url(subdomain: &str) -> String {
    format!("https://{}.zendesk.com", subdomain)
}

/// Build the public link for an article.
pub fn article_link(public_base: &str, article_id: u64) -> String {
    format!(
        "{}/hc/en-us/articles/{}",
        public_base.trim_end_matches('/'),
        article_id
    )
}
