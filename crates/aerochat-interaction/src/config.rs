//! Routing configuration for Aerochat backends.
//!
//! Maps each knowledge domain to its answer backend handle and voice
//! session profile. Routing is configuration, not session logic; the
//! session layer never sees these handles.
//!
//! Loaded from `~/.config/aerochat/routing.toml` by default.

use aerochat_core::error::{AerochatError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Answer backend handle for one domain.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendHandle {
    /// Endpoint the ask request is POSTed to.
    pub url: String,
    /// Retrieval collection queried for this domain.
    pub collection: String,
    /// Optional bearer token for the backend.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Voice session profile for one domain.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceProfile {
    /// Domain-specific system instructions for the realtime model.
    pub instructions: String,
    /// Handle of the domain-scoped knowledge base.
    pub knowledge_base: String,
}

/// Per-domain routing for the answer and voice backends.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Upper bound on a single answer round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Answer backend handles keyed by domain tag.
    #[serde(default)]
    pub backends: HashMap<String, BackendHandle>,
    /// Voice profiles keyed by domain tag.
    #[serde(default)]
    pub voice: HashMap<String, VoiceProfile>,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            backends: HashMap::new(),
            voice: HashMap::new(),
        }
    }
}

impl RoutingConfig {
    /// Loads routing configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or does not
    /// parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AerochatError::io(format!(
                "failed to read routing config at {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads routing configuration from the default location
    /// (`~/.config/aerochat/routing.toml`).
    pub fn load_default() -> Result<Self> {
        let config_dir = aerochat_infrastructure::paths::AerochatPaths::config_dir()
            .map_err(|e| AerochatError::io(e.to_string()))?;
        Self::load(&config_dir.join("routing.toml"))
    }

    /// Returns the answer backend handle routed for a domain.
    pub fn backend(&self, domain: &str) -> Option<&BackendHandle> {
        self.backends.get(domain)
    }

    /// Returns the voice profile routed for a domain.
    pub fn voice_profile(&self, domain: &str) -> Option<&VoiceProfile> {
        self.voice.get(domain)
    }

    /// Returns the answer round-trip timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: RoutingConfig = toml::from_str(
            r#"
            request_timeout_secs = 45

            [backends.a320]
            url = "https://rag.example.com/ask"
            collection = "a320-docs"
            api_key = "secret"

            [voice.a320]
            instructions = "You are an A320 systems expert."
            knowledge_base = "kb-a320"
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(45));
        let backend = config.backend("a320").unwrap();
        assert_eq!(backend.collection, "a320-docs");
        assert_eq!(backend.api_key.as_deref(), Some("secret"));
        assert_eq!(config.voice_profile("a320").unwrap().knowledge_base, "kb-a320");
        assert!(config.backend("a350").is_none());
    }

    #[test]
    fn test_timeout_defaults_when_absent() {
        let config: RoutingConfig = toml::from_str(
            r#"
            [backends.briefing]
            url = "https://rag.example.com/ask"
            collection = "briefing-docs"
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.backend("briefing").unwrap().api_key.is_none());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = RoutingConfig::load(&dir.path().join("routing.toml")).unwrap_err();
        assert!(matches!(err, AerochatError::Io { .. }));
    }
}
