// npm registry and downloads API clients
// Metadata comes from registry.npmjs.org, download counts from api.npmjs.org

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const NPM_REGISTRY_BASE: &str = "https://registry.npmjs.org";
const NPM_DOWNLOADS_BASE: &str = "https://api.npmjs.org";

#[derive(Error, Debug)]
pub enum NpmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NpmError>;

/// Download count window accepted by the downloads-point API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPeriod {
    LastWeek,
    LastMonth,
    LastYear,
}

impl DownloadPeriod {
    /// Path segment the downloads API expects
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadPeriod::LastWeek => "last-week",
            DownloadPeriod::LastMonth => "last-month",
            DownloadPeriod::LastYear => "last-year",
        }
    }
}

/// Full registry document for one package, trimmed to the fields we read.
///
/// The registry is lenient about shapes: `license` may be an SPDX string or
/// an object, `repository` may be a URL string or an object with a `url`
/// field. Both forms show up in the wild, so both are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct NpmPackage {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "dist-tags")]
    pub dist_tags: NpmDistTags,
    pub license: Option<NpmLicense>,
    pub homepage: Option<String>,
    pub repository: Option<NpmRepository>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub maintainers: Vec<NpmMaintainer>,
    /// Publish timestamps keyed by version (plus "created" and "modified")
    #[serde(default)]
    pub time: HashMap<String, DateTime<Utc>>,
    /// Per-version manifests; only the keys matter to us
    #[serde(default)]
    pub versions: serde_json::Map<String, serde_json::Value>,
}

impl NpmPackage {
    /// Latest published version per the registry's dist-tags.
    pub fn latest_version(&self) -> &str {
        &self.dist_tags.latest
    }

    /// Publish timestamp of the latest version, when the registry has it.
    pub fn latest_publish_time(&self) -> Option<DateTime<Utc>> {
        self.time.get(self.latest_version()).copied()
    }

    /// All published version strings, in registry document order.
    pub fn version_list(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Declared repository URL, whichever shape it was published in.
    pub fn repository_url(&self) -> Option<&str> {
        match &self.repository {
            Some(NpmRepository::Url(url)) => Some(url.as_str()),
            Some(NpmRepository::Info { url }) => url.as_deref(),
            None => None,
        }
    }

    /// License as a plain SPDX-ish string.
    pub fn license_str(&self) -> Option<&str> {
        match &self.license {
            Some(NpmLicense::Spdx(s)) => Some(s.as_str()),
            Some(NpmLicense::Object { kind }) => kind.as_deref(),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpmDistTags {
    pub latest: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NpmLicense {
    Spdx(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NpmRepository {
    Url(String),
    Info { url: Option<String> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpmMaintainer {
    pub name: Option<String>,
}

/// Response from the downloads-point endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NpmDownloads {
    pub downloads: u64,
    pub start: String,
    pub end: String,
    pub package: String,
}

pub struct NpmClient {
    client: reqwest::Client,
    registry_base: String,
    downloads_base: String,
}

impl NpmClient {
    pub fn new() -> Self {
        Self::with_base_urls(
            NPM_REGISTRY_BASE.to_string(),
            NPM_DOWNLOADS_BASE.to_string(),
        )
    }

    /// For registry mirrors and tests
    pub fn with_base_urls(registry_base: String, downloads_base: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            registry_base,
            downloads_base,
        }
    }

    /// Fetch the registry document for a package.
    ///
    /// Scoped names ("@scope/name") are percent-encoded, slash included,
    /// which is the form the registry expects.
    pub async fn fetch_package(&self, name: &str) -> Result<NpmPackage> {
        let url = format!("{}/{}", self.registry_base, urlencoding::encode(name));

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(NpmError::NotFound(name.to_string()));
        }

        if response.status() == 429 {
            return Err(NpmError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(NpmError::RequestFailed(format!(
                "registry returned status {}",
                response.status()
            )));
        }

        let package: NpmPackage = response.json().await?;
        Ok(package)
    }

    /// Fetch the download count for a package over the given window.
    pub async fn fetch_downloads(
        &self,
        name: &str,
        period: DownloadPeriod,
    ) -> Result<NpmDownloads> {
        let url = format!(
            "{}/downloads/point/{}/{}",
            self.downloads_base,
            period.as_str(),
            urlencoding::encode(name)
        );

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(NpmError::NotFound(name.to_string()));
        }

        if response.status() == 429 {
            return Err(NpmError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(NpmError::RequestFailed(format!(
                "downloads API returned status {}",
                response.status()
            )));
        }

        let downloads: NpmDownloads = response.json().await?;
        Ok(downloads)
    }
}

impl Default for NpmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_period_path_segments() {
        assert_eq!(DownloadPeriod::LastWeek.as_str(), "last-week");
        assert_eq!(DownloadPeriod::LastMonth.as_str(), "last-month");
        assert_eq!(DownloadPeriod::LastYear.as_str(), "last-year");
    }

    #[test]
    fn test_parse_registry_document() {
        let json = r#"{
            "name": "left-pad",
            "description": "String left pad",
            "dist-tags": { "latest": "1.3.0" },
            "license": "WTFPL",
            "homepage": "https://github.com/stevemao/left-pad",
            "repository": { "type": "git", "url": "git+https://github.com/stevemao/left-pad.git" },
            "keywords": ["leftpad", "pad"],
            "maintainers": [{ "name": "stevemao", "email": "x@example.com" }],
            "time": {
                "created": "2014-03-17T09:09:29.873Z",
                "1.3.0": "2018-04-10T01:37:26.614Z"
            },
            "versions": {
                "1.0.0": {},
                "1.3.0": {}
            }
        }"#;

        let pkg: NpmPackage = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.latest_version(), "1.3.0");
        assert_eq!(pkg.license_str(), Some("WTFPL"));
        assert_eq!(
            pkg.repository_url(),
            Some("git+https://github.com/stevemao/left-pad.git")
        );
        assert_eq!(pkg.version_list(), vec!["1.0.0", "1.3.0"]);
        assert_eq!(pkg.maintainers.len(), 1);
        assert!(pkg.latest_publish_time().is_some());
    }

    #[test]
    fn test_parse_license_object_and_repository_string() {
        // Older packages publish license as an object and repository as a
        // bare URL string
        let json = r#"{
            "name": "oldtimer",
            "dist-tags": { "latest": "0.1.0" },
            "license": { "type": "MIT", "url": "https://example.com/LICENSE" },
            "repository": "https://github.com/someone/oldtimer"
        }"#;

        let pkg: NpmPackage = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.license_str(), Some("MIT"));
        assert_eq!(
            pkg.repository_url(),
            Some("https://github.com/someone/oldtimer")
        );
        assert!(pkg.keywords.is_empty());
        assert!(pkg.version_list().is_empty());
    }

    #[test]
    fn test_parse_downloads_response() {
        let json = r#"{
            "downloads": 2044839,
            "start": "2026-07-27",
            "end": "2026-08-02",
            "package": "left-pad"
        }"#;

        let downloads: NpmDownloads = serde_json::from_str(json).unwrap();
        assert_eq!(downloads.downloads, 2_044_839);
        assert_eq!(downloads.package, "left-pad");
    }
}
