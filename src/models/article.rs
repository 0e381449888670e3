//! Article data structures.

use serde::{Deserialize, Serialize};

/// A knowledge-base article as returned by the listing endpoint.
///
/// Read-only after ingestion; author and metrics data are attached at
/// assembly time, not written back here. Unknown payload fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Article identifier
    pub id: u64,

    /// Article title
    #[serde(default)]
    pub title: String,

    /// Author user id, absent for system-created articles
    #[serde(default)]
    pub author_id: Option<u64>,

    /// Draft flag; false when absent
    #[serde(default)]
    pub draft: bool,

    /// Section identifier
    #[serde(default)]
    pub section_id: Option<u64>,

    /// Category identifier
    #[serde(default)]
    pub category_id: Option<u64>,

    /// Creation timestamp, ISO-8601 as provided by the platform
    #[serde(default)]
    pub created_at: String,

    /// Last-update timestamp, ISO-8601 as provided by the platform
    #[serde(default)]
    pub updated_at: String,

    /// Net vote score carried on the article payload
    #[serde(default)]
    pub vote_sum: i64,

    /// Total vote count carried on the article payload
    #[serde(default)]
    pub vote_count: i64,

    /// Author summary embedded when the listing request asks for users
    #[serde(default)]
    pub user: Option<AuthorSummary>,
}

impl Article {
    /// Publication status derived from the draft flag.
    pub fn status(&self) -> &'static str {
        if self.draft { "draft" } else { "published" }
    }
}

/// Author summary embedded in a listing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// One page of the article listing response.
#[derive(Debug, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        let mut article: Article = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Getting started",
            "draft": true,
        }))
        .unwrap();
        assert_eq!(article.status(), "draft");

        article.draft = false;
        assert_eq!(article.status(), "published");
    }

    #[test]
    fn test_draft_defaults_to_published() {
        let article: Article =
            serde_json::from_value(serde_json::json!({ "id": 7, "title": "No flag" })).unwrap();
        assert_eq!(article.status(), "published");
    }

    #[test]
    fn test_embedded_author_parsed() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "With author",
            "author_id": 11,
            "user": { "id": 11, "name": "Alice", "email": "alice@acme.test" },
        }))
        .unwrap();
        let summary = article.user.unwrap();
        assert_eq!(summary.id, 11);
        assert_eq!(summary.name, "Alice");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let page: ArticlePage = serde_json::from_value(serde_json::json!({
            "articles": [{ "id": 5, "title": "T", "outdated": false, "locale": "en-us" }],
            "count": 1,
        }))
        .unwrap();
        assert_eq!(page.articles.len(), 1);
    }
}
