//! Workflow service configuration (`argonaut.toml`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::BearerToken;
use crate::error::{ClientError, ClientResult};

/// Environment variable consulted when the config file has no token.
pub const TOKEN_ENV_VAR: &str = "ARGONAUT_TOKEN";

pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Argo server host, optionally with a port (`argo.example.com:2746`).
    pub domain: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Never written back out.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// Use plain HTTP instead of HTTPS.
    #[serde(default)]
    pub insecure: bool,
    /// Per-request timeout, e.g. "30s", "500ms", "2m".
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}

impl ServiceConfig {
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            namespace: default_namespace(),
            token: Some(token.into()),
            insecure: false,
            timeout: default_timeout(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn from_toml_str(content: &str) -> ClientResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> ClientResult<String> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Fill in the token from [`TOKEN_ENV_VAR`] when the file did not set one.
    pub fn with_token_from_env(mut self) -> Self {
        if self.token.is_none() {
            self.token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());
        }
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.insecure { "http" } else { "https" }
    }

    /// Argo UI link for a workflow in the configured namespace.
    pub fn workflow_link(&self, name: &str) -> ClientResult<String> {
        check_segment(&self.namespace)?;
        check_segment(name)?;
        Ok(format!(
            "{}://{}/workflows/{}/{name}?tab=workflow",
            self.scheme(),
            self.domain,
            self.namespace
        ))
    }

    pub fn bearer_token(&self) -> ClientResult<BearerToken> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ClientError::Config(format!("no token configured (set {TOKEN_ENV_VAR})")))?;
        BearerToken::new(token)
    }

    pub fn timeout_duration(&self) -> ClientResult<Duration> {
        parse_duration(&self.timeout)
            .ok_or_else(|| ClientError::Config(format!("invalid timeout: {}", self.timeout)))
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.domain.trim().is_empty() {
            return Err(ClientError::Config("domain must not be empty".to_string()));
        }
        if self.domain.contains("://") || self.domain.contains('/') {
            return Err(ClientError::Config(format!(
                "domain must be a bare host, got {}",
                self.domain
            )));
        }
        if self.namespace.trim().is_empty() {
            return Err(ClientError::Config("namespace must not be empty".to_string()));
        }
        self.timeout_duration()?;
        Ok(())
    }
}

/// Namespaces and names are DNS labels; anything that would change the
/// request path or link is rejected.
pub(crate) fn check_segment(segment: &str) -> ClientResult<()> {
    if segment.is_empty() || segment.contains(['/', '?', '#', '%', ' ']) {
        return Err(ClientError::InvalidUri(format!(
            "invalid path segment: {segment:?}"
        )));
    }
    Ok(())
}

/// Parse "5s", "500ms", "2m" or a bare number of seconds.
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok()?.checked_mul(60).map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let config = ServiceConfig::from_toml_str(r#"domain = "argo.example.com""#).unwrap();
        assert_eq!(config.domain, "argo.example.com");
        assert_eq!(config.namespace, "default");
        assert_eq!(config.scheme(), "https");
        assert_eq!(config.timeout_duration().unwrap(), Duration::from_secs(30));
        assert!(config.token.is_none());
    }

    #[test]
    fn token_is_not_serialized() {
        let config = ServiceConfig::new("argo.example.com", "s3cr3t").with_namespace("ci");
        let out = config.to_toml_string().unwrap();
        assert!(out.contains("argo.example.com"));
        assert!(out.contains("ci"));
        assert!(!out.contains("s3cr3t"));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let config = ServiceConfig::from_toml_str(r#"domain = "argo.example.com""#).unwrap();
        assert!(matches!(config.bearer_token(), Err(ClientError::Config(_))));
    }

    #[test]
    fn file_token_wins_over_env() {
        let config = ServiceConfig::new("argo.example.com", "from-file").with_token_from_env();
        assert_eq!(config.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn validate_rejects_urls_as_domain() {
        let config = ServiceConfig::new("https://argo.example.com", "t");
        assert!(config.validate().is_err());
        let config = ServiceConfig::new("", "t");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_timeout() {
        let mut config = ServiceConfig::new("argo.example.com", "t");
        config.timeout = "soon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn link_does_not_need_token() {
        let mut config = ServiceConfig::from_toml_str(r#"domain = "localhost:2746""#).unwrap();
        config.insecure = true;
        assert_eq!(
            config.workflow_link("hello").unwrap(),
            "http://localhost:2746/workflows/default/hello?tab=workflow"
        );
    }

    #[test]
    fn link_rejects_names_that_break_the_path() {
        let config = ServiceConfig::new("argo.example.com", "t");
        assert!(matches!(config.workflow_link("a/b"), Err(ClientError::InvalidUri(_))));
        assert!(config.workflow_link("a?tab=logs").is_err());
        assert!(config.workflow_link("").is_err());
        let config = config.with_namespace("team a");
        assert!(config.workflow_link("hello").is_err());
    }

    #[test]
    fn validate_rejects_overflowing_timeout() {
        let mut config = ServiceConfig::new("argo.example.com", "t");
        config.timeout = "18446744073709551615m".to_string();
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
        assert_eq!(parse_duration("18446744073709551615m"), None);
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("ten"), None);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("argonaut.toml");
        std::fs::write(
            &path,
            r#"
domain = "localhost:2746"
namespace = "argo"
insecure = true
timeout = "5s"
"#,
        )
        .unwrap();

        let config = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(config.namespace, "argo");
        assert_eq!(config.scheme(), "http");
        assert!(config.validate().is_ok());
    }
}
