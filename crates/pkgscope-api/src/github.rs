// GitHub REST API client for repository metadata

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise instances and tests
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

    /// Fetch a repository by owner and name.
    pub async fn get_repo(&self, owner: &str, name: &str) -> Result<GitHubRepo> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, name);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == 404 {
            return Err(GitHubError::NotFound(format!("{}/{}", owner, name)));
        }

        if response.status() == 401 {
            return Err(GitHubError::AuthRequired);
        }

        if response.status() == 429 || response.status() == 403 {
            // GitHub reports rate limiting as 403 on the REST API
            return Err(GitHubError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(GitHubError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let repo: GitHubRepo = response.json().await?;
        Ok(repo)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
}
