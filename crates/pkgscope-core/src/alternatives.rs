// Alternative discovery: curated substitution candidates enriched with
// live popularity data and a coarse migration-effort estimate.

use crate::catalog::{self, MigrationEffort};
use crate::models::DownloadWindow;
use crate::sources::Sources;
use crate::Result;
use serde::Serialize;
use std::cmp::Reverse;

/// At most this many catalog candidates get enriched per request; the
/// catalog lists are already best-first.
const MAX_CANDIDATES: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct AlternativesReport {
    pub original: String,
    pub alternatives: Vec<Alternative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alternative {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u32>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub migration_effort: MigrationEffort,
}

/// Find substitutes for a package.
///
/// The category hint is accepted for forward compatibility but does not
/// influence the result yet. A package with no catalog entry yields an
/// empty list and a pointer to manual search, not an error.
pub async fn find_alternatives(
    src: &Sources,
    package: &str,
    _category: Option<&str>,
) -> Result<AlternativesReport> {
    let Some(candidates) = catalog::alternatives_for(package) else {
        return Ok(AlternativesReport {
            original: package.to_string(),
            alternatives: Vec::new(),
            recommendation: Some(format!(
                "No curated alternatives found for \"{}\". Consider searching the registry for similar packages.",
                package
            )),
        });
    };

    let fetched =
        futures::future::join_all(candidates.iter().take(MAX_CANDIDATES).map(|alt| async move {
            let (profile, weekly) = tokio::join!(
                src.registry.profile(alt),
                src.registry.downloads(alt, DownloadWindow::Week),
            );

            // Candidates the registry doesn't know are dropped outright
            let profile = profile?;

            let repo = src.repo_from_url(profile.repository_url.as_deref()).await;
            let (pros, cons) = catalog::pros_cons_for(alt);

            Some(Alternative {
                name: alt.to_string(),
                description: profile.description,
                weekly_downloads: weekly,
                github_stars: repo.map(|r| r.stars),
                pros,
                cons,
                migration_effort: catalog::migration_effort(package, alt),
            })
        }))
        .await;

    let mut alternatives: Vec<Alternative> = fetched.into_iter().flatten().collect();
    alternatives.sort_by_key(|a| Reverse(a.weekly_downloads.unwrap_or(0)));

    let recommendation = build_recommendation(package, &alternatives);

    Ok(AlternativesReport {
        original: package.to_string(),
        alternatives,
        recommendation,
    })
}

/// Most-downloaded wins unless an easier migration exists elsewhere in
/// the list; then both get named.
fn build_recommendation(package: &str, alternatives: &[Alternative]) -> Option<String> {
    let top = alternatives.first()?;
    let low_effort = alternatives
        .iter()
        .find(|a| a.migration_effort == MigrationEffort::Low);

    match low_effort {
        Some(low) if low.name != top.name => Some(format!(
            "\"{}\" is the most popular, but \"{}\" offers the easiest migration from \"{}\".",
            top.name, low.name, package
        )),
        _ => Some(format!(
            "Consider \"{}\" - {} weekly downloads.",
            top.name,
            top.weekly_downloads.unwrap_or(0)
        )),
    }
}
