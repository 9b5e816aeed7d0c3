// Security audit: advisory retrieval, severity tally, and a
// recommendation the caller can act on.

use crate::models::{AdvisoryRecord, SeverityTally};
use crate::sources::Sources;
use crate::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SecurityAudit {
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    pub total_advisories: usize,
    pub by_severity: SeverityTally,
    pub advisories: Vec<AdvisoryRecord>,
    pub recommendation: String,
}

/// Audit a package (optionally a specific version) for known advisories.
///
/// Unlike research, a missing registry profile is not fatal here: the
/// advisories are still worth reporting, the latest-version field just
/// stays absent. Note that the advisory list is not narrowed by the
/// version argument (see `AdvisorySource::advisories`); the severity
/// tally covers everything the database knows about the package.
pub async fn check_security(
    src: &Sources,
    package: &str,
    version: Option<&str>,
) -> Result<SecurityAudit> {
    let (profile, advisories) = tokio::join!(
        src.registry.profile(package),
        src.advisories.advisories(package, version),
    );

    let by_severity = SeverityTally::from_advisories(&advisories);

    let mut recommendation = if advisories.is_empty() {
        match version {
            Some(v) => format!("No known security advisories for \"{}\" {}.", package, v),
            None => format!("No known security advisories for \"{}\".", package),
        }
    } else if by_severity.critical > 0 {
        format!(
            "CRITICAL: {} critical vulnerabilities found. Update immediately.",
            by_severity.critical
        )
    } else if by_severity.high > 0 {
        format!(
            "HIGH: {} high severity issues. Update recommended.",
            by_severity.high
        )
    } else {
        format!(
            "{} advisories found. Review and consider updating.",
            advisories.len()
        )
    };

    let latest_version = profile.map(|p| p.latest_version);

    // Point at the newer release when the audited version trails it
    if let (Some(latest), Some(queried)) = (latest_version.as_deref(), version) {
        if latest != queried {
            recommendation.push_str(&format!(" Latest version: {}", latest));
        }
    }

    Ok(SecurityAudit {
        package: package.to_string(),
        version: version.map(|s| s.to_string()),
        latest_version,
        total_advisories: advisories.len(),
        by_severity,
        advisories,
        recommendation,
    })
}
