//! Configuration Management
//!
//! One provider configuration value, layered from the config file, the
//! environment and command-line flags. Both API versions derive their
//! clients from it.

use crate::jumpcloud::client::ApiClient;
use crate::jumpcloud::http::Credentials;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default JumpCloud console endpoint
pub const DEFAULT_API_URL: &str = "https://console.jumpcloud.com";

pub const ENV_API_KEY: &str = "JUMPCLOUD_API_KEY";
pub const ENV_ORG_ID: &str = "JUMPCLOUD_ORG_ID";
pub const ENV_API_URL: &str = "JUMPCLOUD_URL";

/// Provider configuration
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Administrator API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Organization ID for multi-tenant administrators
    #[serde(default)]
    pub org_id: Option<String>,
    /// Console endpoint, without the `/api` suffix
    #[serde(default)]
    pub api_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("org_id", &self.org_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jumpcloud-provider").join("config.yaml"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Overlay values found by `lookup` (normally `std::env::var`)
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = non_empty(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = non_empty(ENV_ORG_ID) {
            self.org_id = Some(v);
        }
        if let Some(v) = non_empty(ENV_API_URL) {
            self.api_url = Some(v);
        }
        self
    }

    /// Overlay explicitly given values (CLI > env > file)
    pub fn with_overrides(
        mut self,
        api_key: Option<String>,
        org_id: Option<String>,
        api_url: Option<String>,
    ) -> Self {
        self.api_key = api_key.or(self.api_key);
        self.org_id = org_id.or(self.org_id);
        self.api_url = api_url.or(self.api_url);
        self
    }

    /// Get effective console endpoint
    pub fn effective_api_url(&self) -> String {
        self.api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Base path of the v1 API
    pub fn v1_base_path(&self) -> String {
        format!("{}/api", self.effective_api_url())
    }

    /// Base path of the v2 API
    pub fn v2_base_path(&self) -> String {
        format!("{}/api/v2", self.effective_api_url())
    }

    fn credentials(&self) -> Result<Credentials> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            bail!("No JumpCloud API key configured. Set {} or use --api-key", ENV_API_KEY);
        };

        let api_url = self.effective_api_url();
        url::Url::parse(&api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;

        Ok(Credentials {
            api_key: api_key.to_string(),
            org_id: self.org_id.clone(),
        })
    }

    /// Build a client for the v1 API
    pub fn v1_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.v1_base_path(), self.credentials()?)
    }

    /// Build a client for the v2 API
    pub fn v2_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.v2_base_path(), self.credentials()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_layering_cli_over_env_over_file() {
        let file = Config::from_yaml("api_key: from-file\norg_id: org-file\n").unwrap();
        let config = file
            .with_env(lookup(&[(ENV_API_KEY, "from-env"), (ENV_API_URL, "")]))
            .with_overrides(None, Some("org-cli".to_string()), None);

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.org_id.as_deref(), Some("org-cli"));
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
        assert!(Config::from_yaml("api_key: [unclosed").is_err());
    }

    #[test]
    fn test_base_paths_share_one_endpoint() {
        let config = Config {
            api_url: Some("http://127.0.0.1:8080/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.v1_base_path(), "http://127.0.0.1:8080/api");
        assert_eq!(config.v2_base_path(), "http://127.0.0.1:8080/api/v2");

        let default = Config::default();
        assert_eq!(default.v1_base_path(), "https://console.jumpcloud.com/api");
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = Config::default().v1_client().unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));

        let config = Config {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let client = config.v2_client().unwrap();
        assert_eq!(client.base_path, "https://console.jumpcloud.com/api/v2");
        assert_eq!(client.credentials.api_key, "key");
    }

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let config = Config {
            api_key: Some("key".to_string()),
            api_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.v1_client().is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
