// Capability seams between the derivations and the outside world.
//
// Every source follows the same two-outcome contract: a lookup either
// yields a value or it doesn't. Transport failures, unexpected statuses
// and genuine not-founds all collapse into the absent case at the adapter
// layer, so one failing branch of a concurrent fan-out can never abort
// its siblings. Derivations decide per-field what absence means.

use crate::models::{AdvisoryRecord, DownloadWindow, PackageProfile, RepoStat};
use std::sync::Arc;

/// Package registry lookups (metadata and download counts).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    /// Normalized profile for a package, or None if the registry doesn't
    /// know it (or couldn't be reached).
    async fn profile(&self, name: &str) -> Option<PackageProfile>;

    /// Download count over a window, or None when the stats service has
    /// no figure. Absent is not zero.
    async fn downloads(&self, name: &str, window: DownloadWindow) -> Option<u64>;
}

/// Repository-hosting lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepoSource: Send + Sync {
    async fn stats(&self, owner: &str, name: &str) -> Option<RepoStat>;
}

/// Security advisory lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AdvisorySource: Send + Sync {
    /// Known advisories for a package. The version argument is accepted
    /// for future range matching but does not narrow the result today:
    /// npm range semantics are out of scope, so every advisory for the
    /// package comes back regardless of version. A failed lookup is an
    /// empty list.
    async fn advisories<'a>(&self, name: &str, version: Option<&'a str>) -> Vec<AdvisoryRecord>;
}

/// Owner/name pair extracted from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// Parse a GitHub repository URL in any of the shapes npm manifests
/// declare them: https, git+https, git, ssh, and scp-style
/// "git@github.com:owner/repo", with or without a ".git" suffix or
/// trailing path segments. Anything else is simply unresolvable, never
/// an error.
pub fn parse_repo_url(url: &str) -> Option<RepoRef> {
    let lower = url.to_ascii_lowercase();
    let idx = lower.find("github.com")?;

    let rest = &url[idx + "github.com".len()..];
    let rest = rest.strip_prefix(['/', ':'])?;

    let mut parts = rest.splitn(3, '/');
    let owner = parts.next()?;
    let name = parts.next()?;

    let name = name.split(['?', '#']).next().unwrap_or(name);
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return None;
    }

    let owner_ok = owner
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let name_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !owner_ok || !name_ok {
        return None;
    }

    Some(RepoRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// The bundle of capabilities a derivation runs against.
///
/// Arc'd trait objects so the same sources can be shared across the MCP
/// handler, the CLI, and concurrent invocations without ceremony.
#[derive(Clone)]
pub struct Sources {
    pub registry: Arc<dyn RegistrySource>,
    pub repos: Arc<dyn RepoSource>,
    pub advisories: Arc<dyn AdvisorySource>,
}

impl Sources {
    pub fn new(
        registry: Arc<dyn RegistrySource>,
        repos: Arc<dyn RepoSource>,
        advisories: Arc<dyn AdvisorySource>,
    ) -> Self {
        Self {
            registry,
            repos,
            advisories,
        }
    }

    /// Resolve repository stats from a declared repository URL.
    ///
    /// This is the one lookup that depends on another lookup's result
    /// (the profile carries the URL), so callers sequence it after the
    /// profile fetch rather than joining it into the first batch.
    pub async fn repo_from_url(&self, url: Option<&str>) -> Option<RepoStat> {
        let repo_ref = parse_repo_url(url?)?;
        self.repos.stats(&repo_ref.owner, &repo_ref.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> Option<(String, String)> {
        parse_repo_url(url).map(|r| (r.owner, r.name))
    }

    #[test]
    fn test_parse_https_url() {
        assert_eq!(
            parsed("https://github.com/facebook/react"),
            Some(("facebook".to_string(), "react".to_string()))
        );
    }

    #[test]
    fn test_parse_git_plus_https_with_suffix() {
        assert_eq!(
            parsed("git+https://github.com/stevemao/left-pad.git"),
            Some(("stevemao".to_string(), "left-pad".to_string()))
        );
    }

    #[test]
    fn test_parse_scp_style() {
        assert_eq!(
            parsed("git@github.com:colinhacks/zod.git"),
            Some(("colinhacks".to_string(), "zod".to_string()))
        );
    }

    #[test]
    fn test_parse_ssh_url() {
        assert_eq!(
            parsed("ssh://git@github.com/tj/commander.js.git"),
            Some(("tj".to_string(), "commander.js".to_string()))
        );
    }

    #[test]
    fn test_parse_with_trailing_path() {
        assert_eq!(
            parsed("https://github.com/vitejs/vite/tree/main/packages/vite"),
            Some(("vitejs".to_string(), "vite".to_string()))
        );
    }

    #[test]
    fn test_parse_case_insensitive_host() {
        assert_eq!(
            parsed("https://GitHub.com/Owner/Repo"),
            Some(("Owner".to_string(), "Repo".to_string()))
        );
    }

    #[test]
    fn test_unresolvable_urls() {
        assert_eq!(parsed("https://gitlab.com/owner/repo"), None);
        assert_eq!(parsed("github:owner/repo"), None);
        assert_eq!(parsed("https://github.com/owner-only"), None);
        assert_eq!(parsed("https://github.com//repo"), None);
        assert_eq!(parsed("not a url at all"), None);
    }
}
