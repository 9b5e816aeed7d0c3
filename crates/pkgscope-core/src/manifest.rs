// Manifest analysis: batch audit of a package.json dependency map with
// a prioritized action list.

use crate::models::{DownloadWindow, Severity};
use crate::sources::Sources;
use crate::version::{self, UpdateStatus};
use crate::{Error, Result};
use serde::Serialize;

// Fan-out bounds against the external services, not a correctness
// requirement. Raise them if your rate limits allow.
const MAX_RUNTIME_DEPS: usize = 20;
const MAX_DEV_DEPS: usize = 10;

const PRIORITY_SECURITY_SLOTS: usize = 3;
const PRIORITY_MAJOR_SLOTS: usize = 2;

/// Dependency declarations pulled out of a package.json object, in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    pub dependencies: Vec<(String, String)>,
    pub dev_dependencies: Vec<(String, String)>,
}

impl PackageManifest {
    /// Extract the dependency sections from a parsed package.json value.
    ///
    /// Only the shape is validated: the value must be an object, and
    /// declared versions must be strings. Anything else about the
    /// manifest is none of our business.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::InvalidArgument(
                "packageJson must be a JSON object".to_string(),
            ));
        };

        Ok(Self {
            dependencies: Self::section(object, "dependencies")?,
            dev_dependencies: Self::section(object, "devDependencies")?,
        })
    }

    fn section(
        object: &serde_json::Map<String, serde_json::Value>,
        key: &str,
    ) -> Result<Vec<(String, String)>> {
        let Some(section) = object.get(key) else {
            return Ok(Vec::new());
        };

        let Some(map) = section.as_object() else {
            return Err(Error::InvalidArgument(format!(
                "\"{}\" must be an object mapping names to version ranges",
                key
            )));
        };

        map.iter()
            .map(|(name, spec)| match spec.as_str() {
                Some(spec) => Ok((name.clone(), spec.to_string())),
                None => Err(Error::InvalidArgument(format!(
                    "version range for \"{}\" must be a string",
                    name
                ))),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub name: String,
    pub current: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    pub status: UpdateStatus,
    pub security_issues: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestReport {
    pub total_dependencies: usize,
    pub outdated_count: usize,
    pub security_issue_count: usize,
    pub dependencies: Vec<DependencyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Vec<DependencyReport>>,
    pub summary: String,
    pub top_priorities: Vec<String>,
}

/// Audit one dependency: update status, downloads, advisories.
async fn analyze_dependency(src: &Sources, name: &str, spec: &str) -> DependencyReport {
    let (profile, weekly, advisories) = tokio::join!(
        src.registry.profile(name),
        src.registry.downloads(name, DownloadWindow::Week),
        src.advisories.advisories(name, None),
    );

    let current = version::strip_range_operators(spec).to_string();
    let security_issues = advisories.len();

    let Some(profile) = profile else {
        return DependencyReport {
            name: name.to_string(),
            current,
            latest: None,
            status: UpdateStatus::Unknown,
            security_issues,
            weekly_downloads: None,
            recommendation: Some("Package not found on the npm registry".to_string()),
        };
    };

    let status = version::classify_update(&current, &profile.latest_version);

    let mut recommendation = match status {
        UpdateStatus::Major => Some(format!(
            "Major update available: {} -> {}. Check the changelog for breaking changes.",
            current, profile.latest_version
        )),
        UpdateStatus::Minor => Some(format!(
            "Minor update: {} -> {}",
            current, profile.latest_version
        )),
        UpdateStatus::Patch => Some(format!(
            "Patch update: {} -> {}",
            current, profile.latest_version
        )),
        UpdateStatus::UpToDate | UpdateStatus::Unknown => None,
    };

    // Urgent advisories trump whatever the version delta had to say
    let urgent = advisories
        .iter()
        .filter(|a| a.severity >= Severity::High)
        .count();
    if urgent > 0 {
        recommendation = Some(format!(
            "{} security issue(s) affecting this dependency. Update immediately.",
            urgent
        ));
    }

    DependencyReport {
        name: name.to_string(),
        current,
        latest: Some(profile.latest_version),
        status,
        security_issues,
        weekly_downloads: weekly,
        recommendation,
    }
}

/// Audit a manifest's dependencies and produce a prioritized action list.
pub async fn analyze_manifest(
    src: &Sources,
    manifest: &PackageManifest,
    include_dev: bool,
) -> Result<ManifestReport> {
    let runtime = &manifest.dependencies[..manifest.dependencies.len().min(MAX_RUNTIME_DEPS)];
    let dev: &[(String, String)] = if include_dev {
        &manifest.dev_dependencies[..manifest.dev_dependencies.len().min(MAX_DEV_DEPS)]
    } else {
        &[]
    };

    let (dependencies, dev_dependencies) = tokio::join!(
        futures::future::join_all(
            runtime.iter().map(|(name, spec)| analyze_dependency(src, name, spec)),
        ),
        futures::future::join_all(
            dev.iter().map(|(name, spec)| analyze_dependency(src, name, spec)),
        ),
    );

    let all: Vec<&DependencyReport> = dependencies.iter().chain(dev_dependencies.iter()).collect();

    let outdated_count = all
        .iter()
        .filter(|r| r.status != UpdateStatus::UpToDate && r.status != UpdateStatus::Unknown)
        .count();
    let security_issue_count: usize = all.iter().map(|r| r.security_issues).sum();

    let top_priorities = build_priorities(&all);
    let summary = build_summary(all.len(), security_issue_count, outdated_count);

    Ok(ManifestReport {
        total_dependencies: all.len(),
        outdated_count,
        security_issue_count,
        dependencies,
        dev_dependencies: if dev_dependencies.is_empty() {
            None
        } else {
            Some(dev_dependencies)
        },
        summary,
        top_priorities,
    })
}

/// Security-laden dependencies first, then major updates that weren't
/// already mentioned.
fn build_priorities(all: &[&DependencyReport]) -> Vec<String> {
    let mut priorities = Vec::new();
    let mut listed: Vec<&str> = Vec::new();

    let mut with_security: Vec<&&DependencyReport> =
        all.iter().filter(|r| r.security_issues > 0).collect();
    with_security.sort_by(|a, b| b.security_issues.cmp(&a.security_issues));

    for report in with_security.into_iter().take(PRIORITY_SECURITY_SLOTS) {
        priorities.push(format!(
            "Update {} - {} security issue(s)",
            report.name, report.security_issues
        ));
        listed.push(&report.name);
    }

    let majors = all
        .iter()
        .filter(|r| r.status == UpdateStatus::Major && !listed.contains(&r.name.as_str()));
    for report in majors.take(PRIORITY_MAJOR_SLOTS) {
        priorities.push(format!(
            "{}: major update {} -> {}",
            report.name,
            report.current,
            report.latest.as_deref().unwrap_or("?")
        ));
    }

    priorities
}

fn build_summary(total: usize, security_issues: usize, outdated: usize) -> String {
    let mut summary = format!("Analyzed {} dependencies. ", total);
    if security_issues > 0 {
        summary.push_str(&format!("{} security issues found. ", security_issues));
    }
    if outdated > 0 {
        summary.push_str(&format!("{} packages have updates available.", outdated));
    } else {
        summary.push_str("All packages up to date!");
    }
    summary
}
