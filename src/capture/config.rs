use serde::Serialize;

use super::env::Env;

/// Environment key holding the project API key
pub const API_KEY_VAR: &str = "POSTHOG_API_KEY";
/// Environment key holding the collector base URL
pub const HOST_VAR: &str = "POSTHOG_HOST";
/// Collector used when no host is configured
pub const DEFAULT_HOST: &str = "https://us.i.posthog.com";
/// Template value shipped in sample configs; treated as "not configured"
pub const PLACEHOLDER_API_KEY: &str = "YOUR_POSTHOG_API_KEY";
/// Distinct id attached when the caller does not identify a user
pub const DEFAULT_DISTINCT_ID: &str = "server_side";
/// Event name PostHog uses for error tracking
pub const EXCEPTION_EVENT: &str = "$exception";

const CAPTURE_PATH: &str = "/capture/";

/// Reporter settings resolved from an [`Env`] for a single call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReporterConfig {
    pub api_key: Option<String>,
    pub host: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl ReporterConfig {
    /// Resolve settings; empty values count as unset
    pub fn from_env<E: Env + ?Sized>(env: &E) -> Self {
        let api_key = env.var(API_KEY_VAR).filter(|k| !k.is_empty());
        let host = env
            .var(HOST_VAR)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Self { api_key, host }
    }

    /// The API key, if reporting is enabled
    pub fn enabled_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled_key().is_some()
    }

    /// `{host}/capture/` with any trailing slashes on the host removed
    pub fn capture_url(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), CAPTURE_PATH)
    }

    /// API key with everything but the first few characters hidden
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let visible: String = key.chars().take(4).collect();
            if key.chars().count() <= 4 {
                "*".repeat(key.chars().count())
            } else {
                format!("{}…", visible)
            }
        })
    }
}
