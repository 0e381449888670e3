// src/pipeline/assemble.rs

//! Export record assembly.
//!
//! Pure join of articles, resolved authors, and resolved metrics. No network
//! or filesystem side effects; every article yields exactly one record.

use crate::models::{Article, ExportRecord};
use crate::services::UserResolver;
use crate::services::metrics::MetricsMap;
use crate::utils::article_link;

/// Join articles with their resolved author and metrics.
///
/// Missing author or metrics data degrades to placeholder values; no
/// article is ever dropped.
pub fn assemble(
    articles: &[Article],
    users: &UserResolver,
    metrics: &MetricsMap,
    public_base: &str,
) -> Vec<ExportRecord> {
    articles
        .iter()
        .map(|article| {
            let author = users.resolve(article.author_id);
            let record = metrics.get(&article.id).copied().unwrap_or_default();

            ExportRecord {
                article_title: article.title.clone(),
                article_link: article_link(public_base, article.id),
                article_author_name: author.name,
                author_id: article.author_id,
                author_email: author.email,
                views: record.views,
                comments: record.comments,
                votes: record.votes,
                vote_sum: article.vote_sum,
                vote_count: article.vote_count,
                article_id: article.id,
                created_at: article.created_at.clone(),
                updated_at: article.updated_at.clone(),
                status: article.status().to_string(),
                section_id: article.section_id,
                category_id: article.category_id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricsRecord;

    fn article(id: u64, author_id: Option<u64>) -> Article {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Article {}", id),
            "author_id": author_id,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_unresolvable_article_still_emitted_with_defaults() {
        let articles = vec![article(1, Some(99))];
        let users = UserResolver::prime_from_articles(&[]);
        let metrics = MetricsMap::new();

        let records = assemble(&articles, &users, &metrics, "https://acme.zendesk.com");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.views, 0);
        assert_eq!(record.comments, 0);
        assert_eq!(record.votes, 0);
        assert!(record.article_author_name.starts_with("Unknown Author"));
        assert_eq!(record.status, "published");
    }

    #[test]
    fn test_count_is_preserved() {
        let articles: Vec<Article> = (1..=25).map(|id| article(id, None)).collect();
        let users = UserResolver::prime_from_articles(&articles);
        let metrics = MetricsMap::new();

        let records = assemble(&articles, &users, &metrics, "https://acme.zendesk.com");
        assert_eq!(records.len(), articles.len());
    }

    #[test]
    fn test_metrics_and_link_attached() {
        let articles = vec![article(7, None)];
        let users = UserResolver::prime_from_articles(&articles);
        let mut metrics = MetricsMap::new();
        metrics.insert(
            7,
            MetricsRecord {
                views: 44,
                comments: 2,
                votes: 1,
            },
        );

        let records = assemble(&articles, &users, &metrics, "https://acme.zendesk.com");
        assert_eq!(records[0].views, 44);
        assert_eq!(
            records[0].article_link,
            "https://acme.zendesk.com/hc/en-us/articles/7"
        );
    }

    #[test]
    fn test_draft_status_derived() {
        let mut draft = article(3, None);
        draft.draft = true;
        let users = UserResolver::prime_from_articles(&[]);

        let records = assemble(&[draft], &users, &MetricsMap::new(), "https://acme.zendesk.com");
        assert_eq!(records[0].status, "draft");
    }
}
