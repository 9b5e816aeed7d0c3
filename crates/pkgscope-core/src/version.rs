// Version comparison helpers built on strict semver parsing.
// Range operators from manifest declarations are stripped before any
// comparison so "^1.2.3", "~1.2.3" and ">=1.2.3" all classify alike.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of update available between an installed baseline and the
/// registry's latest version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStatus {
    UpToDate,
    Patch,
    Minor,
    Major,
    Unknown,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateStatus::UpToDate => "up-to-date",
            UpdateStatus::Patch => "patch",
            UpdateStatus::Minor => "minor",
            UpdateStatus::Major => "major",
            UpdateStatus::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Strip leading range operator characters (any combination of `^ ~ > = <`)
/// from a declared version spec, leaving a bare version for comparison.
pub fn strip_range_operators(spec: &str) -> &str {
    spec.trim()
        .trim_start_matches(['^', '~', '>', '=', '<'])
        .trim_start()
}

/// Classify the update from `current` to `latest`.
///
/// Strict semver parsing on both sides; anything that fails to parse is
/// Unknown rather than a guess. Pre-release-only differences count as
/// patch-level.
pub fn classify_update(current: &str, latest: &str) -> UpdateStatus {
    let (Ok(current), Ok(latest)) = (Version::parse(current), Version::parse(latest)) else {
        return UpdateStatus::Unknown;
    };

    if current == latest {
        UpdateStatus::UpToDate
    } else if current.major != latest.major {
        UpdateStatus::Major
    } else if current.minor != latest.minor {
        UpdateStatus::Minor
    } else {
        UpdateStatus::Patch
    }
}

/// Zero-based rank of `installed` among the syntactically valid versions
/// sorted newest-first.
///
/// Returns None when the installed version is up to date (rank 0), is not
/// a valid version, or does not appear in the list at all - "how far
/// behind" is only meaningful when we can actually place it.
pub fn versions_behind(installed: &str, versions: &[String]) -> Option<usize> {
    let installed = Version::parse(installed).ok()?;

    let mut valid: Vec<Version> = versions
        .iter()
        .filter_map(|v| Version::parse(v).ok())
        .collect();
    valid.sort_by(|a, b| b.cmp(a));

    match valid.iter().position(|v| *v == installed) {
        Some(0) | None => None,
        Some(rank) => Some(rank),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_range_operators() {
        assert_eq!(strip_range_operators("^1.0.0"), "1.0.0");
        assert_eq!(strip_range_operators("~1.2.3"), "1.2.3");
        assert_eq!(strip_range_operators(">=1.2.3"), "1.2.3");
        assert_eq!(strip_range_operators(">= 1.2.3"), "1.2.3");
        assert_eq!(strip_range_operators("<2.0.0"), "2.0.0");
        assert_eq!(strip_range_operators("=1.0.0"), "1.0.0");
        assert_eq!(strip_range_operators("1.0.0"), "1.0.0");
        assert_eq!(strip_range_operators(" ^1.0.0 "), "1.0.0");
    }

    #[test]
    fn test_stripping_is_operator_agnostic() {
        // Same baseline regardless of which operator was declared
        for spec in ["^1.0.0", "~1.0.0", ">=1.0.0", ">1.0.0", "<1.0.0", "=1.0.0"] {
            assert_eq!(strip_range_operators(spec), "1.0.0", "spec: {}", spec);
        }
    }

    #[test]
    fn test_classify_update() {
        assert_eq!(classify_update("1.0.0", "1.0.0"), UpdateStatus::UpToDate);
        assert_eq!(classify_update("1.0.0", "1.0.1"), UpdateStatus::Patch);
        assert_eq!(classify_update("1.0.0", "1.3.0"), UpdateStatus::Minor);
        assert_eq!(classify_update("1.3.0", "2.0.0"), UpdateStatus::Major);
        // Pre-release-only difference is patch-level
        assert_eq!(classify_update("1.0.0-beta.1", "1.0.0"), UpdateStatus::Patch);
    }

    #[test]
    fn test_classify_update_invalid_versions() {
        assert_eq!(classify_update("not-a-version", "1.0.0"), UpdateStatus::Unknown);
        assert_eq!(classify_update("1.0.0", "latest"), UpdateStatus::Unknown);
        assert_eq!(classify_update("1.0", "1.0.0"), UpdateStatus::Unknown);
        assert_eq!(classify_update("*", "1.0.0"), UpdateStatus::Unknown);
    }

    #[test]
    fn test_versions_behind() {
        let versions: Vec<String> = ["1.0.0", "1.1.0", "1.2.0", "2.0.0", "not-semver"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        // 1.1.0 sits behind 2.0.0 and 1.2.0
        assert_eq!(versions_behind("1.1.0", &versions), Some(2));
        // Newest version is rank 0, which we report as "not behind"
        assert_eq!(versions_behind("2.0.0", &versions), None);
        // Not in the list
        assert_eq!(versions_behind("0.9.0", &versions), None);
        // Invalid installed version
        assert_eq!(versions_behind("oops", &versions), None);
    }
}
