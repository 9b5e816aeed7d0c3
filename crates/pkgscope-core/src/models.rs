// Shared value records produced by the data sources and consumed by the
// derivations. Everything here is an immutable per-request snapshot;
// nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized registry metadata for one package at its latest version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageProfile {
    pub name: String,
    pub description: Option<String>,
    pub latest_version: String,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub keywords: Vec<String>,
    pub maintainer_count: usize,
    /// Repository URL as declared in the manifest, unparsed
    pub repository_url: Option<String>,
    /// Every published version string, registry document order
    pub versions: Vec<String>,
    /// Publish timestamp of the latest version
    pub published_at: Option<DateTime<Utc>>,
}

impl PackageProfile {
    /// Whether the package ships type declarations: either it advertises
    /// them via keywords or it lives under the @types scope.
    pub fn has_type_declarations(&self) -> bool {
        self.keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case("typescript") || k.eq_ignore_ascii_case("types"))
            || self.name.starts_with("@types/")
    }
}

/// Repository activity stats from the hosting platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoStat {
    pub stars: u32,
    pub forks: u32,
    pub open_issues: u32,
    pub pushed_at: Option<DateTime<Utc>>,
    pub archived: bool,
}

/// Download count window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadWindow {
    Week,
    Month,
    Year,
}

/// Advisory severity, ordered so that comparisons follow urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Parse a severity string from an advisory feed. Unknown labels map
    /// to Moderate, matching how the advisory database reports unrated
    /// entries.
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "low" => Severity::Low,
            _ => Severity::Moderate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One disclosed vulnerability affecting some version range of a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub cve: Option<String>,
    pub patched_versions: Option<String>,
    pub vulnerable_versions: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// Per-severity advisory counts. Always sums to the length of the list
/// it was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityTally {
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

impl SeverityTally {
    pub fn from_advisories(advisories: &[AdvisoryRecord]) -> Self {
        let mut tally = Self::default();
        for advisory in advisories {
            match advisory.severity {
                Severity::Critical => tally.critical += 1,
                Severity::High => tally.high += 1,
                Severity::Moderate => tally.moderate += 1,
                Severity::Low => tally.low += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.moderate + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(severity: Severity) -> AdvisoryRecord {
        AdvisoryRecord {
            id: "GHSA-test".to_string(),
            severity,
            title: "test advisory".to_string(),
            cve: None,
            patched_versions: None,
            vulnerable_versions: None,
            published_at: None,
            url: None,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Low);
    }

    #[test]
    fn test_severity_lenient_parse() {
        assert_eq!(Severity::parse_lenient("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::parse_lenient("high"), Severity::High);
        assert_eq!(Severity::parse_lenient("low"), Severity::Low);
        assert_eq!(Severity::parse_lenient("moderate"), Severity::Moderate);
        assert_eq!(Severity::parse_lenient("medium"), Severity::Moderate);
        assert_eq!(Severity::parse_lenient(""), Severity::Moderate);
    }

    #[test]
    fn test_tally_sums_to_length() {
        let advisories = vec![
            advisory(Severity::Critical),
            advisory(Severity::High),
            advisory(Severity::High),
            advisory(Severity::Low),
        ];
        let tally = SeverityTally::from_advisories(&advisories);
        assert_eq!(tally.critical, 1);
        assert_eq!(tally.high, 2);
        assert_eq!(tally.low, 1);
        assert_eq!(tally.total(), advisories.len());

        let empty = SeverityTally::from_advisories(&[]);
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn test_type_declaration_detection() {
        let mut profile = PackageProfile {
            name: "zustand".to_string(),
            description: None,
            latest_version: "5.0.0".to_string(),
            license: None,
            homepage: None,
            keywords: vec!["react".to_string(), "TypeScript".to_string()],
            maintainer_count: 1,
            repository_url: None,
            versions: vec![],
            published_at: None,
        };
        assert!(profile.has_type_declarations());

        profile.keywords = vec!["react".to_string()];
        assert!(!profile.has_type_declarations());

        profile.name = "@types/node".to_string();
        assert!(profile.has_type_declarations());
    }
}
