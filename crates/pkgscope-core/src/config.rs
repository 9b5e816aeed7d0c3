use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from the platform config directory; every field has a sensible
/// default pointing at the public services, so no config file is needed
/// to get going.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub github: GitHubConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("pkgscope");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// npm registry endpoint (override for mirrors)
    #[serde(default = "default_registry_url")]
    pub api_url: String,

    /// npm downloads-point endpoint
    #[serde(default = "default_downloads_url")]
    pub downloads_url: String,
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_downloads_url() -> String {
    "https://api.npmjs.org".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: default_registry_url(),
            downloads_url: default_downloads_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub personal access token, used for repo stats and the advisory
    /// database. Optional, but unauthenticated quotas are small.
    /// Get one at https://github.com/settings/tokens
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry.api_url, "https://registry.npmjs.org");
        assert_eq!(config.registry.downloads_url, "https://api.npmjs.org");
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [github]
            token = "ghp_example"
            "#,
        )
        .unwrap();

        assert_eq!(config.github.token.as_deref(), Some("ghp_example"));
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.registry.api_url, "https://registry.npmjs.org");
    }
}
