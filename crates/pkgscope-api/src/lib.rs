// API client implementations for the external data services
pub mod advisories;
pub mod github;
pub mod npm;

// Re-export common types
pub use advisories::{AdvisoryClient, GhsaAdvisory, GhsaVulnerability};
pub use github::{GitHubClient, GitHubRepo};
pub use npm::{DownloadPeriod, NpmClient, NpmDownloads, NpmPackage};

/// User agent sent with every outbound request. Both the npm and GitHub
/// APIs reject requests without one.
pub const USER_AGENT: &str = "PkgScope/0.1.0";
