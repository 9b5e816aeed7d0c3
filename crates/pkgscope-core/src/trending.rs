// Trend discovery: popularity trajectory of a curated category's
// packages, classified against each package's own recent average.

use crate::catalog;
use crate::models::DownloadWindow;
use crate::sources::Sources;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

/// Fan-out bound per request, same spirit as the manifest caps.
const MAX_CANDIDATES: usize = 8;

/// Keep at least this many members after a framework filter; a filter
/// that cuts deeper gets discarded entirely.
const MIN_FILTERED: usize = 3;

/// Demand trajectory relative to the package's own monthly average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Stable,
    Declining,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Rising => "rising",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        };
        write!(f, "{}", label)
    }
}

/// Classify weekly demand against a quarter of the monthly figure.
/// More than 10% above is rising, more than 10% below is declining;
/// the band between (inclusive at both edges) is stable. No monthly
/// figure means there is nothing to compare against, so stable.
fn classify_trend(weekly: u64, monthly: Option<u64>) -> Trend {
    let Some(monthly) = monthly else {
        return Trend::Stable;
    };
    let weekly_avg = monthly as f64 / 4.0;
    let weekly = weekly as f64;

    if weekly > weekly_avg * 1.1 {
        Trend::Rising
    } else if weekly < weekly_avg * 0.9 {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingReport {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    pub packages: Vec<TrendingRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_pick: Option<String>,
    pub rising_stars: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weekly_downloads: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    pub trending: Trend,
}

/// Members of a category after the optional framework filter.
///
/// A recognized framework keeps members whose name contains one of its
/// identifying substrings (case-insensitive). Unrecognized frameworks
/// and frameworks with no identifying substrings leave the list alone,
/// and a filter that leaves fewer than three members is discarded.
fn filtered_members(members: &[&'static str], framework: Option<&str>) -> Vec<&'static str> {
    let prefixes = framework.and_then(catalog::framework_prefixes);

    if let Some(prefixes) = prefixes {
        if !prefixes.is_empty() {
            let filtered: Vec<&'static str> = members
                .iter()
                .copied()
                .filter(|name| {
                    let lower = name.to_ascii_lowercase();
                    prefixes.iter().any(|p| lower.contains(&p.to_ascii_lowercase()))
                })
                .collect();
            if filtered.len() >= MIN_FILTERED {
                return filtered;
            }
        }
    }

    members.to_vec()
}

/// Rank a curated category's packages by current demand and flag the
/// risers. Unknown categories are a caller error; individual packages
/// that can't be profiled or have no weekly figure are dropped.
pub async fn get_trending(
    src: &Sources,
    category: &str,
    framework: Option<&str>,
) -> Result<TrendingReport> {
    let members = catalog::category_packages(category).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "unknown category \"{}\"; available: {}",
            category,
            catalog::category_names().join(", ")
        ))
    })?;

    let members = filtered_members(members, framework);

    let rows = futures::future::join_all(members.iter().take(MAX_CANDIDATES).map(
        |name| async move {
            let (profile, weekly, monthly) = tokio::join!(
                src.registry.profile(name),
                src.registry.downloads(name, DownloadWindow::Week),
                src.registry.downloads(name, DownloadWindow::Month),
            );

            // No profile or no weekly figure means nothing to rank by
            let profile = profile?;
            let weekly = weekly?;

            let repo = src.repo_from_url(profile.repository_url.as_deref()).await;

            Some(TrendingRow {
                name: profile.name,
                description: profile.description,
                weekly_downloads: weekly,
                github_stars: repo.map(|r| r.stars),
                last_update: profile.published_at,
                trending: classify_trend(weekly, monthly),
            })
        },
    ))
    .await;

    let mut packages: Vec<TrendingRow> = rows.into_iter().flatten().collect();
    packages.sort_by_key(|row| Reverse(row.weekly_downloads));

    let top_pick = packages.first().map(|row| row.name.clone());
    let rising_stars = packages
        .iter()
        .filter(|row| row.trending == Trend::Rising)
        .map(|row| row.name.clone())
        .collect();

    Ok(TrendingReport {
        category: category.to_string(),
        framework: framework.map(|s| s.to_string()),
        packages,
        top_pick,
        rising_stars,
    })
}
