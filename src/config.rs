// src/config.rs

//! Application configuration.
//!
//! Two layers are kept separate: behavior settings loaded from an optional
//! TOML file (falling back to defaults), and credentials resolved from CLI
//! flags, an optional `.env`-style file, and process environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::log;

/// Environment keys recognized in the credential file and process environment.
const SUBDOMAIN_KEY: &str = "ZENDESK_SUBDOMAIN";
const EMAIL_KEY: &str = "ZENDESK_EMAIL";
const API_TOKEN_KEY: &str = "ZENDESK_API_TOKEN";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client and pagination behavior settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Author resolution settings
    #[serde(default)]
    pub users: UserConfig,

    /// Metrics fallback chain settings
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// CSV output settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn(&format!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            ));
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.metrics.per_article_cap == 0 {
            return Err(AppError::config("metrics.per_article_cap must be > 0"));
        }
        if self.metrics.scrape_cap == 0 {
            return Err(AppError::config("metrics.scrape_cap must be > 0"));
        }
        if self.metrics.scrape_user_agent.trim().is_empty() {
            return Err(AppError::config("metrics.scrape_user_agent is empty"));
        }
        if self.export.filename_prefix.trim().is_empty() {
            return Err(AppError::config("export.filename_prefix is empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            users: UserConfig::default(),
            metrics: MetricsConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP client and pagination behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between listing page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// How article authors are resolved into user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLookupMode {
    /// Use author summaries embedded in listing responses; no extra requests
    Embedded,
    /// Issue one lookup request per distinct author id
    Direct,
}

/// Author resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Resolution mode, mutually exclusive per run
    #[serde(default = "defaults::user_lookup")]
    pub lookup: UserLookupMode,

    /// Delay between per-user lookup requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            lookup: defaults::user_lookup(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Metrics fallback chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Maximum article ids attempted by the per-article metrics source
    #[serde(default = "defaults::per_article_cap")]
    pub per_article_cap: usize,

    /// Delay between per-article metrics requests in milliseconds
    #[serde(default = "defaults::per_article_delay")]
    pub per_article_delay_ms: u64,

    /// Maximum article pages fetched by the scraping source
    #[serde(default = "defaults::scrape_cap")]
    pub scrape_cap: usize,

    /// Delay between page fetches in milliseconds
    #[serde(default = "defaults::scrape_delay")]
    pub scrape_delay_ms: u64,

    /// User-Agent header for the unauthenticated scraping client
    #[serde(default = "defaults::scrape_user_agent")]
    pub scrape_user_agent: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            per_article_cap: defaults::per_article_cap(),
            per_article_delay_ms: defaults::per_article_delay(),
            scrape_cap: defaults::scrape_cap(),
            scrape_delay_ms: defaults::scrape_delay(),
            scrape_user_agent: defaults::scrape_user_agent(),
        }
    }
}

/// CSV output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Prefix for derived output filenames
    #[serde(default = "defaults::filename_prefix")]
    pub filename_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: defaults::filename_prefix(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level printed to the console
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::UserLookupMode;

    // API defaults
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }

    // User resolution defaults
    pub fn user_lookup() -> UserLookupMode {
        UserLookupMode::Embedded
    }

    // Metrics defaults
    pub fn per_article_cap() -> usize {
        20
    }
    pub fn per_article_delay() -> u64 {
        200
    }
    pub fn scrape_cap() -> usize {
        10
    }
    pub fn scrape_delay() -> u64 {
        1000
    }
    pub fn scrape_user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".into()
    }

    // Export defaults
    pub fn filename_prefix() -> String {
        "zendesk_articles".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

/// Resolved account credentials for one run.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account subdomain, e.g. `company` for company.zendesk.com
    pub subdomain: String,

    /// Account email address
    pub email: String,

    /// API token paired with the email
    pub api_token: String,
}

/// Raw credential inputs prior to resolution.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub subdomain: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub env_file: Option<PathBuf>,
}

impl Credentials {
    /// Resolve credentials from a `.env`-style file, CLI flags, and the
    /// process environment, in that order of precedence.
    ///
    /// A named credential file that cannot be read is a fatal error; a
    /// missing credential after all sources are consulted is as well.
    pub fn resolve(overrides: &CredentialOverrides) -> Result<Self> {
        let file_values = match &overrides.env_file {
            Some(path) => load_env_file(path)?,
            None => HashMap::new(),
        };

        let subdomain = pick(&file_values, SUBDOMAIN_KEY, &overrides.subdomain);
        let email = pick(&file_values, EMAIL_KEY, &overrides.email);
        let api_token = pick(&file_values, API_TOKEN_KEY, &overrides.api_token);

        match (subdomain, email, api_token) {
            (Some(subdomain), Some(email), Some(api_token)) => Ok(Self {
                subdomain,
                email,
                api_token,
            }),
            _ => Err(AppError::config(
                "Missing required credentials: provide --subdomain, --email and --api-token, \
                 use --env-file, or set the ZENDESK_* environment variables",
            )),
        }
    }
}

/// First non-empty value among file entry, CLI flag, and environment variable.
fn pick(file_values: &HashMap<String, String>, key: &str, flag: &Option<String>) -> Option<String> {
    non_empty(file_values.get(key).cloned())
        .or_else(|| non_empty(flag.clone()))
        .or_else(|| non_empty(std::env::var(key).ok()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a `key=value` credential file.
///
/// Comment lines, blank lines, and surrounding quotes are handled by the
/// dotenv parser. A missing or unreadable file is fatal.
fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let entries = dotenvy::from_path_iter(path).map_err(|e| {
        AppError::config(format!(
            "Failed to read credential file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut values = HashMap::new();
    for entry in entries {
        let (key, value) = entry.map_err(|e| {
            AppError::config(format!("Invalid line in {}: {}", path.display(), e))
        })?;
        values.insert(key, value);
    }
    Ok(values)
}
