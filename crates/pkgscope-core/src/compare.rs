// Side-by-side comparison of a handful of packages, ranked by a
// popularity score.

use crate::models::DownloadWindow;
use crate::sources::Sources;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;

/// Version string used for requested packages the registry doesn't know.
/// The row still appears so the caller always gets one row per request.
pub const NOT_FOUND_MARKER: &str = "NOT FOUND";

const MIN_PACKAGES: usize = 2;
const MAX_PACKAGES: usize = 5;

/// Stars weigh 100:1 against weekly downloads. A deliberate heuristic,
/// not a measured ratio; kept stable for output compatibility.
const STAR_WEIGHT: u64 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub packages: Vec<ComparisonRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    pub has_types: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    pub maintainers: usize,
}

impl ComparisonRow {
    fn not_found(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: NOT_FOUND_MARKER.to_string(),
            description: Some("Package not found on the npm registry".to_string()),
            weekly_downloads: Some(0),
            github_stars: Some(0),
            last_update: None,
            has_types: false,
            license: None,
            maintainers: 0,
        }
    }

    fn is_not_found(&self) -> bool {
        self.version == NOT_FOUND_MARKER
    }
}

fn popularity_score(row: &ComparisonRow) -> u64 {
    row.weekly_downloads.unwrap_or(0) + u64::from(row.github_stars.unwrap_or(0)) * STAR_WEIGHT
}

/// Compare 2-5 packages. Always yields one row per requested package, in
/// request order; ranking only feeds the recommendation text.
pub async fn compare_packages(src: &Sources, packages: &[String]) -> Result<Comparison> {
    if packages.len() < MIN_PACKAGES || packages.len() > MAX_PACKAGES {
        return Err(Error::InvalidArgument(format!(
            "provide between {} and {} packages to compare, got {}",
            MIN_PACKAGES,
            MAX_PACKAGES,
            packages.len()
        )));
    }

    let rows = futures::future::join_all(packages.iter().map(|name| async move {
        let (profile, weekly) = tokio::join!(
            src.registry.profile(name),
            src.registry.downloads(name, DownloadWindow::Week),
        );

        let Some(profile) = profile else {
            return ComparisonRow::not_found(name);
        };

        let repo = src.repo_from_url(profile.repository_url.as_deref()).await;

        ComparisonRow {
            name: profile.name,
            version: profile.latest_version,
            description: profile.description,
            weekly_downloads: weekly,
            github_stars: repo.map(|r| r.stars),
            last_update: profile.published_at,
            has_types: profile.keywords.iter().any(|k| {
                k.eq_ignore_ascii_case("typescript") || k.eq_ignore_ascii_case("types")
            }) || name.starts_with("@types/"),
            license: profile.license,
            maintainers: profile.maintainer_count,
        }
    }))
    .await;

    // Stable sort: ties keep request order
    let mut ranked: Vec<&ComparisonRow> = rows.iter().filter(|r| !r.is_not_found()).collect();
    ranked.sort_by_key(|r| Reverse(popularity_score(r)));

    let recommendation = ranked.first().map(|top| {
        format!(
            "Based on popularity and activity, \"{}\" leads with {} weekly downloads and {} GitHub stars.",
            top.name,
            top.weekly_downloads.unwrap_or(0),
            top.github_stars.unwrap_or(0)
        )
    });

    Ok(Comparison {
        packages: rows,
        recommendation,
    })
}
