// src/services/client.rs

//! Authenticated REST API client.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ApiConfig, Credentials};
use crate::error::{AppError, Result};
use crate::models::{ApiUser, ArticlePage, UserEnvelope};
use crate::utils::api_base_url;

/// HTTP client carrying the account's token credentials.
///
/// Token auth uses the account email suffixed with `/token` as the basic-auth
/// username and the API token as the password. All requests carry JSON
/// content-type and accept headers. No retries happen at this layer; fallback
/// policy belongs to the callers.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    token: String,
}

impl ApiClient {
    /// Create a client targeting the account's standard API base URL.
    pub fn new(config: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        Self::with_base_url(config, credentials, api_base_url(&credentials.subdomain))
    }

    /// Create a client targeting an explicit base URL.
    ///
    /// Used by tests and non-standard hosts; behavior is otherwise identical
    /// to [`ApiClient::new`].
    pub fn with_base_url(
        config: &ApiConfig,
        credentials: &Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: credentials.email.clone(),
            token: credentials.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(Url::parse(&joined)?)
    }

    /// Perform a GET request and return the raw response.
    ///
    /// Transport failures surface as errors; non-2xx statuses are left for
    /// the caller to inspect.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .basic_auth(format!("{}/token", self.email), Some(&self.token))
            .query(query)
            .send()
            .await?;
        Ok(response)
    }

    /// Perform a GET request and decode a JSON body.
    ///
    /// Non-2xx statuses are reported as [`AppError::Api`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get(path, query).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api(status.as_u16(), response.url().as_str()));
        }
        Ok(response.json::<T>().await?)
    }

    /// Verify API reachability by fetching a single article page.
    pub async fn check_connection(&self) -> Result<()> {
        let _page: ArticlePage = self
            .get_json(
                "help_center/articles.json",
                &[("per_page", "1".to_string())],
            )
            .await?;
        Ok(())
    }

    /// Identity of the authenticated account.
    pub async fn current_user(&self) -> Result<ApiUser> {
        let envelope: UserEnvelope = self.get_json("users/me.json", &[]).await?;
        Ok(envelope.user)
    }
}
