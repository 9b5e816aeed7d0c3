// Builders shared by the derivation tests. Everything runs against
// mocked sources; no test in this crate touches the network.

use crate::models::{AdvisoryRecord, PackageProfile, RepoStat, Severity};
use crate::sources::{
    MockAdvisorySource, MockRegistrySource, MockRepoSource, Sources,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

/// A plausible profile with the given name and latest version.
pub fn profile(name: &str, version: &str) -> PackageProfile {
    PackageProfile {
        name: name.to_string(),
        description: Some(format!("{} does things", name)),
        latest_version: version.to_string(),
        license: Some("MIT".to_string()),
        homepage: None,
        keywords: Vec::new(),
        maintainer_count: 2,
        repository_url: Some(format!("https://github.com/example/{}", name)),
        versions: Vec::new(),
        published_at: Some(Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()),
    }
}

pub fn advisory(id: &str, severity: Severity) -> AdvisoryRecord {
    AdvisoryRecord {
        id: id.to_string(),
        severity,
        title: format!("advisory {}", id),
        cve: None,
        patched_versions: None,
        vulnerable_versions: None,
        published_at: None,
        url: None,
    }
}

pub fn repo_stat(stars: u32) -> RepoStat {
    RepoStat {
        stars,
        forks: stars / 10,
        open_issues: 5,
        pushed_at: Some(Utc.with_ymd_and_hms(2026, 7, 15, 0, 0, 0).unwrap()),
        archived: false,
    }
}

/// A repo source that never finds anything.
pub fn no_repos() -> MockRepoSource {
    let mut repos = MockRepoSource::new();
    repos.expect_stats().returning(|_, _| None);
    repos
}

/// An advisory source that always comes back clean.
pub fn no_advisories() -> MockAdvisorySource {
    let mut advisories = MockAdvisorySource::new();
    advisories.expect_advisories().returning(|_, _| Vec::new());
    advisories
}

pub fn sources(
    registry: MockRegistrySource,
    repos: MockRepoSource,
    advisories: MockAdvisorySource,
) -> Sources {
    Sources::new(Arc::new(registry), Arc::new(repos), Arc::new(advisories))
}
