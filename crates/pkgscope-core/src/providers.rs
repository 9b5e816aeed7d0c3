// Live adapters bridging the API clients to the capability traits.
//
// These are where the fault-isolation policy lives: every client error,
// including unexpected HTTP statuses, is logged and folded into absence.
// The typed errors stay available to anyone using pkgscope-api directly.

use crate::config::Config;
use crate::models::{AdvisoryRecord, DownloadWindow, PackageProfile, RepoStat, Severity};
use crate::sources::{AdvisorySource, RegistrySource, RepoSource, Sources};
use async_trait::async_trait;
use pkgscope_api::advisories::AdvisoryError;
use pkgscope_api::npm::NpmError;
use pkgscope_api::{AdvisoryClient, DownloadPeriod, GhsaAdvisory, GitHubClient, GitHubRepo, NpmClient, NpmPackage};
use std::sync::Arc;

/// Registry source backed by the public npm APIs.
pub struct NpmRegistrySource {
    client: NpmClient,
}

impl NpmRegistrySource {
    pub fn new(client: NpmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RegistrySource for NpmRegistrySource {
    async fn profile(&self, name: &str) -> Option<PackageProfile> {
        match self.client.fetch_package(name).await {
            Ok(package) => Some(profile_from_npm(package)),
            Err(NpmError::NotFound(_)) => None,
            Err(err) => {
                tracing::warn!("npm profile lookup failed for {}: {}", name, err);
                None
            }
        }
    }

    async fn downloads(&self, name: &str, window: DownloadWindow) -> Option<u64> {
        let period = match window {
            DownloadWindow::Week => DownloadPeriod::LastWeek,
            DownloadWindow::Month => DownloadPeriod::LastMonth,
            DownloadWindow::Year => DownloadPeriod::LastYear,
        };

        match self.client.fetch_downloads(name, period).await {
            Ok(downloads) => Some(downloads.downloads),
            Err(NpmError::NotFound(_)) => None,
            Err(err) => {
                tracing::warn!("npm download lookup failed for {}: {}", name, err);
                None
            }
        }
    }
}

/// Convert a raw registry document into our normalized profile.
fn profile_from_npm(package: NpmPackage) -> PackageProfile {
    PackageProfile {
        latest_version: package.latest_version().to_string(),
        published_at: package.latest_publish_time(),
        versions: package.version_list(),
        repository_url: package.repository_url().map(|s| s.to_string()),
        license: package.license_str().map(|s| s.to_string()),
        maintainer_count: package.maintainers.len(),
        name: package.name,
        description: package.description,
        homepage: package.homepage,
        keywords: package.keywords,
    }
}

/// Repository source backed by the GitHub REST API.
pub struct GitHubRepoSource {
    client: GitHubClient,
}

impl GitHubRepoSource {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepoSource for GitHubRepoSource {
    async fn stats(&self, owner: &str, name: &str) -> Option<RepoStat> {
        match self.client.get_repo(owner, name).await {
            Ok(repo) => Some(repo_from_github(repo)),
            Err(pkgscope_api::github::GitHubError::NotFound(_)) => None,
            Err(err) => {
                tracing::warn!("GitHub repo lookup failed for {}/{}: {}", owner, name, err);
                None
            }
        }
    }
}

fn repo_from_github(repo: GitHubRepo) -> RepoStat {
    RepoStat {
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        open_issues: repo.open_issues_count,
        pushed_at: repo.pushed_at,
        archived: repo.archived,
    }
}

/// Advisory source backed by the GitHub Security Advisories database.
pub struct GhsaAdvisorySource {
    client: AdvisoryClient,
}

impl GhsaAdvisorySource {
    pub fn new(client: AdvisoryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdvisorySource for GhsaAdvisorySource {
    async fn advisories<'a>(&self, name: &str, _version: Option<&'a str>) -> Vec<AdvisoryRecord> {
        // See the trait doc: the version is not used to narrow the list.
        match self.client.list_for_package(name).await {
            Ok(advisories) => advisories.into_iter().map(advisory_from_ghsa).collect(),
            Err(AdvisoryError::RateLimitExceeded) => {
                tracing::warn!("advisory lookup for {} hit the rate limit", name);
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("advisory lookup failed for {}: {}", name, err);
                Vec::new()
            }
        }
    }
}

fn advisory_from_ghsa(advisory: GhsaAdvisory) -> AdvisoryRecord {
    AdvisoryRecord {
        severity: advisory
            .severity
            .as_deref()
            .map(Severity::parse_lenient)
            .unwrap_or(Severity::Moderate),
        title: advisory
            .summary
            .clone()
            .unwrap_or_else(|| "Unknown vulnerability".to_string()),
        patched_versions: advisory.patched_versions().map(|s| s.to_string()),
        vulnerable_versions: advisory.vulnerable_range().map(|s| s.to_string()),
        id: advisory.ghsa_id,
        cve: advisory.cve_id,
        published_at: advisory.published_at,
        url: advisory.html_url,
    }
}

/// Build the live source bundle from configuration.
pub fn live_sources(config: &Config) -> Sources {
    let token = config.github.token.clone();

    let npm = NpmClient::with_base_urls(
        config.registry.api_url.clone(),
        config.registry.downloads_url.clone(),
    );
    let github = GitHubClient::with_base_url(token.clone(), config.github.api_url.clone());
    let advisories = AdvisoryClient::with_base_url(token, config.github.api_url.clone());

    Sources::new(
        Arc::new(NpmRegistrySource::new(npm)),
        Arc::new(GitHubRepoSource::new(github)),
        Arc::new(GhsaAdvisorySource::new(advisories)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_conversion_defaults() {
        let ghsa = GhsaAdvisory {
            ghsa_id: "GHSA-1".to_string(),
            cve_id: None,
            summary: None,
            description: None,
            severity: None,
            published_at: None,
            html_url: None,
            vulnerabilities: Vec::new(),
        };

        let record = advisory_from_ghsa(ghsa);
        assert_eq!(record.severity, Severity::Moderate);
        assert_eq!(record.title, "Unknown vulnerability");
        assert!(record.patched_versions.is_none());
    }

    #[test]
    fn test_profile_conversion_from_document() {
        let json = r#"{
            "name": "zod",
            "description": "TypeScript-first schema validation",
            "dist-tags": { "latest": "3.23.8" },
            "license": "MIT",
            "repository": { "type": "git", "url": "git+https://github.com/colinhacks/zod.git" },
            "keywords": ["typescript", "schema"],
            "maintainers": [{ "name": "colinhacks" }],
            "time": { "3.23.8": "2024-04-01T00:00:00Z" },
            "versions": { "3.23.7": {}, "3.23.8": {} }
        }"#;
        let package: NpmPackage = serde_json::from_str(json).unwrap();

        let profile = profile_from_npm(package);
        assert_eq!(profile.name, "zod");
        assert_eq!(profile.latest_version, "3.23.8");
        assert_eq!(profile.maintainer_count, 1);
        assert_eq!(profile.versions.len(), 2);
        assert!(profile.published_at.is_some());
        assert!(profile.has_type_declarations());
    }
}
