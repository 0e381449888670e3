// src/services/users.rs

//! Author resolution and caching.
//!
//! Maps author ids to user records for the duration of one run. The cache
//! is filled either from author summaries embedded in listing responses
//! (no network) or by direct per-id lookups; the two modes are mutually
//! exclusive per run.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::config::{UserConfig, UserLookupMode};
use crate::models::{Article, User, UserEnvelope};
use crate::services::ApiClient;
use crate::utils::log;

/// Per-run author cache.
pub struct UserResolver {
    mode: UserLookupMode,
    cache: HashMap<u64, User>,
}

impl UserResolver {
    /// Build the cache from author summaries embedded in the articles.
    ///
    /// Issues no network requests; authors without an embedded summary
    /// resolve to a placeholder.
    pub fn prime_from_articles(articles: &[Article]) -> Self {
        let mut cache = HashMap::new();
        for article in articles {
            if let Some(summary) = &article.user {
                cache.insert(
                    summary.id,
                    User {
                        id: Some(summary.id),
                        name: summary.name.clone(),
                        email: summary.email.clone(),
                    },
                );
            }
        }

        log::info(&format!(
            "Primed author cache with {} embedded users",
            cache.len()
        ));
        Self {
            mode: UserLookupMode::Embedded,
            cache,
        }
    }

    /// Build the cache with one lookup request per distinct author id.
    ///
    /// The id set is deduplicated before iterating, so each author is
    /// fetched at most once. A failed lookup caches a placeholder record to
    /// avoid re-fetching the same id.
    pub async fn fetch_direct(
        client: &ApiClient,
        articles: &[Article],
        config: &UserConfig,
    ) -> Self {
        let author_ids: BTreeSet<u64> = articles.iter().filter_map(|a| a.author_id).collect();
        let delay = Duration::from_millis(config.request_delay_ms);

        log::info(&format!(
            "Fetching information for {} unique authors...",
            author_ids.len()
        ));

        let mut cache = HashMap::new();
        for id in author_ids {
            let user = match client
                .get_json::<UserEnvelope>(&format!("users/{}.json", id), &[])
                .await
            {
                Ok(envelope) => User {
                    id: Some(id),
                    name: envelope.user.name,
                    email: envelope.user.email,
                },
                Err(error) => {
                    log::warn(&format!("Could not fetch user {}: {}", id, error));
                    User::placeholder(id)
                }
            };
            cache.insert(id, user);

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        log::success(&format!("Author information cached for {} users", cache.len()));
        Self {
            mode: UserLookupMode::Direct,
            cache,
        }
    }

    /// Resolve an author id to a user record.
    ///
    /// Pure cache lookup; misses yield a placeholder and never trigger a
    /// network call.
    pub fn resolve(&self, author_id: Option<u64>) -> User {
        let Some(id) = author_id else {
            return User::anonymous();
        };
        if let Some(user) = self.cache.get(&id) {
            return user.clone();
        }
        match self.mode {
            UserLookupMode::Embedded => User::anonymous(),
            UserLookupMode::Direct => User::placeholder(id),
        }
    }

    /// Number of cached author records.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when no author records are cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
