// GitHub Security Advisories client
// Queries the global advisory database filtered to the npm ecosystem

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdvisoryError>;

pub struct AdvisoryClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl AdvisoryClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For tests and proxied deployments
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            token,
            base_url,
        }
    }

    /// List published advisories affecting an npm package.
    ///
    /// Unauthenticated requests work but share a small hourly quota; a
    /// token raises the limit considerably.
    pub async fn list_for_package(&self, name: &str) -> Result<Vec<GhsaAdvisory>> {
        let url = format!("{}/advisories", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("ecosystem", "npm"), ("affects", name)]);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == 401 {
            return Err(AdvisoryError::AuthRequired);
        }

        if response.status() == 429 || response.status() == 403 {
            return Err(AdvisoryError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(AdvisoryError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let advisories: Vec<GhsaAdvisory> = response.json().await?;
        Ok(advisories)
    }
}

/// One advisory from the global database, trimmed to the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct GhsaAdvisory {
    pub ghsa_id: String,
    pub cve_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<GhsaVulnerability>,
}

impl GhsaAdvisory {
    /// Version range affected, from the first vulnerability entry.
    pub fn vulnerable_range(&self) -> Option<&str> {
        self.vulnerabilities
            .first()
            .and_then(|v| v.vulnerable_version_range.as_deref())
    }

    /// Patched versions, from the first vulnerability entry.
    pub fn patched_versions(&self) -> Option<&str> {
        self.vulnerabilities
            .first()
            .and_then(|v| v.patched_versions.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhsaVulnerability {
    pub package: Option<GhsaPackage>,
    pub vulnerable_version_range: Option<String>,
    pub patched_versions: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhsaPackage {
    pub ecosystem: Option<String>,
    pub name: Option<String>,
}
