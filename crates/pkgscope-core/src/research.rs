// Single-package research: the full profile of one package, merged from
// every source we have.

use crate::models::{AdvisoryRecord, DownloadWindow, RepoStat, Severity, SeverityTally};
use crate::sources::Sources;
use crate::version;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How many advisory briefs the report carries. The counts always cover
/// the full list; only the surfaced entries are capped.
const MAX_SURFACED_ADVISORIES: usize = 5;

/// How many keywords the report carries.
const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    pub latest_version: String,
    /// How many releases the installed version trails the newest by.
    /// Absent when up to date or when the installed version can't be
    /// placed in the release list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions_behind: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepoStat>,
    pub security: SecuritySummary,
    pub maintenance: MaintenanceInfo,
    pub has_types: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecuritySummary {
    pub advisory_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    /// Top advisories by severity, capped at five
    pub advisories: Vec<AdvisoryBrief>,
}

impl SecuritySummary {
    fn from_advisories(advisories: &[AdvisoryRecord]) -> Self {
        let tally = SeverityTally::from_advisories(advisories);

        // Stable sort keeps source order within a severity level
        let mut ranked: Vec<&AdvisoryRecord> = advisories.iter().collect();
        ranked.sort_by(|a, b| b.severity.cmp(&a.severity));

        Self {
            advisory_count: advisories.len(),
            critical_count: tally.critical,
            high_count: tally.high,
            advisories: ranked
                .into_iter()
                .take(MAX_SURFACED_ADVISORIES)
                .map(|a| AdvisoryBrief {
                    id: a.id.clone(),
                    severity: a.severity,
                    title: a.title.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryBrief {
    pub id: String,
    pub severity: Severity,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_publish: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_publish: Option<i64>,
    pub maintainer_count: usize,
}

/// Research a package against the wall clock.
pub async fn research_package(
    src: &Sources,
    package: &str,
    current_version: Option<&str>,
) -> Result<ResearchReport> {
    research_package_at(src, package, current_version, Utc::now()).await
}

/// Research a package with an explicit clock. This is the real
/// implementation; the wall-clock wrapper exists so callers don't have to
/// care, and tests can pin `now`.
///
/// This is the one derivation where a missing profile is a hard failure:
/// with no registry record there is nothing meaningful to report.
pub async fn research_package_at(
    src: &Sources,
    package: &str,
    current_version: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ResearchReport> {
    let (profile, weekly, monthly, advisories) = tokio::join!(
        src.registry.profile(package),
        src.registry.downloads(package, DownloadWindow::Week),
        src.registry.downloads(package, DownloadWindow::Month),
        src.advisories.advisories(package, current_version),
    );

    let profile = profile.ok_or_else(|| {
        Error::NotFound(format!("package \"{}\" not found on the npm registry", package))
    })?;

    // Needs the profile's declared URL, so it runs after the batch
    let repository = src.repo_from_url(profile.repository_url.as_deref()).await;

    let versions_behind =
        current_version.and_then(|v| version::versions_behind(v, &profile.versions));

    let days_since_last_publish = profile
        .published_at
        .map(|published| (now - published).num_days());

    let security = SecuritySummary::from_advisories(&advisories);

    let has_types = profile.has_type_declarations();

    let mut keywords = profile.keywords;
    keywords.truncate(MAX_KEYWORDS);

    Ok(ResearchReport {
        name: profile.name,
        description: profile.description,
        current_version: current_version.map(|s| s.to_string()),
        latest_version: profile.latest_version,
        versions_behind,
        weekly_downloads: weekly,
        monthly_downloads: monthly,
        repository,
        security,
        maintenance: MaintenanceInfo {
            last_publish: profile.published_at,
            days_since_last_publish,
            maintainer_count: profile.maintainer_count,
        },
        has_types,
        license: profile.license,
        homepage: profile.homepage,
        keywords,
    })
}
