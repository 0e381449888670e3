//! User data structures.

use serde::Deserialize;

/// A resolved author record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User id; absent for placeholder records covering authorless articles
    pub id: Option<u64>,

    /// Display name
    pub name: String,

    /// Email address, when the source exposes one
    pub email: Option<String>,
}

impl User {
    /// Placeholder for an article with no author id.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            name: "Unknown Author".to_string(),
            email: None,
        }
    }

    /// Placeholder for an author id that could not be looked up.
    pub fn placeholder(id: u64) -> Self {
        Self {
            id: Some(id),
            name: format!("Unknown Author (ID: {})", id),
            email: None,
        }
    }
}

/// User payload from the per-user lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Envelope wrapping a single user lookup response.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: ApiUser,
}
