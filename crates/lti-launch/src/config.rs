//! Verifier configuration.

use serde::{Deserialize, Serialize};

use crate::oauth::{SignatureMethod, SimpleValidator, DEFAULT_TIMESTAMP_WINDOW_SECS};

/// Launch verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Maximum clock skew for `oauth_timestamp`, in seconds. `0` disables the check.
    #[serde(default = "default_timestamp_window")]
    pub timestamp_window_secs: u64,

    /// Whether `PLAINTEXT` signatures are accepted (only safe over TLS).
    #[serde(default)]
    pub allow_plaintext: bool,

    /// Public base URL the consumer signed against.
    ///
    /// When set, the launch URL is rebased onto it with
    /// [`rebase_url`](crate::rebase_url) before verification.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_timestamp_window() -> u64 {
    DEFAULT_TIMESTAMP_WINDOW_SECS
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timestamp_window_secs: default_timestamp_window(),
            allow_plaintext: false,
            public_base_url: None,
        }
    }
}

impl VerifierConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `LTI_TIMESTAMP_WINDOW_SECS` | Max clock skew in seconds, `0` disables (default: 300) |
    /// | `LTI_ALLOW_PLAINTEXT` | Accept `PLAINTEXT` signatures |
    /// | `LTI_PUBLIC_BASE_URL` | Rebase launch URLs onto this host |
    pub fn from_env() -> Self {
        Self {
            timestamp_window_secs: std::env::var("LTI_TIMESTAMP_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timestamp_window),
            allow_plaintext: std::env::var("LTI_ALLOW_PLAINTEXT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            public_base_url: std::env::var("LTI_PUBLIC_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Set the timestamp window.
    pub fn with_timestamp_window(mut self, secs: u64) -> Self {
        self.timestamp_window_secs = secs;
        self
    }

    /// Accept `PLAINTEXT` signatures.
    pub fn with_allow_plaintext(mut self, allow: bool) -> Self {
        self.allow_plaintext = allow;
        self
    }

    /// Set the public base URL.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Build the signature validator this config describes.
    pub fn validator(&self) -> SimpleValidator {
        let window = (self.timestamp_window_secs > 0).then_some(self.timestamp_window_secs);
        let validator = SimpleValidator::new().with_timestamp_window(window);
        if self.allow_plaintext {
            validator.allow_method(SignatureMethod::Plaintext)
        } else {
            validator
        }
    }
}
