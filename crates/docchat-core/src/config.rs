use crate::{DocchatError, DocchatResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the conversation does when a question is submitted while an
/// earlier one is still waiting for its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitPolicy {
    /// Allow overlapping requests. Answers are matched to their turn by id.
    #[default]
    Concurrent,
    /// Reject a new question with `Busy` until the pending one resolves.
    Serialize,
}

/// Explicit configuration handed to the upload session and the
/// conversation manager at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub submit_policy: SubmitPolicy,
    /// Number of transcript lines visible at once.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_viewport_height() -> usize {
    20
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
            submit_policy: SubmitPolicy::default(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document. Missing keys fall back to their defaults.
    pub fn from_toml_str(s: &str) -> DocchatResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| DocchatError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the base URL, e.g. from an environment variable or flag.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Checks the values that cannot be expressed in the type.
    pub fn validate(&self) -> DocchatResult<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DocchatError::Config(format!(
                "api_base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.viewport_height == 0 {
            return Err(DocchatError::Config(
                "viewport_height must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(DocchatError::Config(
                "request_timeout_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Joins an endpoint path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Per-request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.submit_policy, SubmitPolicy::Concurrent);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_full_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://docs.example.com/api/"
            request_timeout_secs = 30
            submit_policy = "serialize"
            viewport_height = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.submit_policy, SubmitPolicy::Serialize);
        assert_eq!(config.viewport_height, 8);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.endpoint("/ask"), "https://docs.example.com/api/ask");
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint("upload"), "http://localhost:8000/upload");
        assert_eq!(config.endpoint("/upload"), "http://localhost:8000/upload");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_toml_str(r#"api_base_url = "localhost:8000""#),
            Err(DocchatError::Config(_))
        ));
        assert!(ClientConfig::from_toml_str("viewport_height = 0").is_err());
        assert!(ClientConfig::from_toml_str("request_timeout_secs = 0").is_err());
        assert!(ClientConfig::from_toml_str(r#"submit_policy = "queue""#).is_err());
    }

    #[test]
    fn test_with_api_base_url_override() {
        let config = ClientConfig::default().with_api_base_url("http://10.0.0.5:9000");
        assert_eq!(config.endpoint("documents"), "http://10.0.0.5:9000/documents");
    }
}
