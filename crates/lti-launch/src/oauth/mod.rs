//! OAuth 1.0a one-legged signature verification (RFC 5849).
//!
//! This is the signature collaborator of the launch verifier:
//!
//! - [`OAuthMessage`]: method, URL and parameters of a signed request
//! - [`base_string`]: canonical signature base string (§3.4.1)
//! - [`SignatureMethod`]: `HMAC-SHA1`, `HMAC-SHA256` and `PLAINTEXT`
//! - [`SignatureValidator`]: the validation seam, with [`SimpleValidator`]
//!   as the default implementation
//!
//! Nonce replay detection is not performed here; hosts that need it track
//! `oauth_nonce` themselves.

mod base_string;
mod encoding;
mod signature;
mod validator;

pub use base_string::{base_string, normalize_parameters, normalize_url};
pub use encoding::{parse_authorization_header, percent_decode, percent_encode};
pub use signature::SignatureMethod;
pub use validator::{SignatureValidator, SimpleValidator, DEFAULT_TIMESTAMP_WINDOW_SECS};

use crate::request::{ParameterSource, SourceError};

pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_NONCE: &str = "oauth_nonce";
pub const OAUTH_VERSION: &str = "oauth_version";

/// The only protocol version accepted in `oauth_version`.
pub const OAUTH_VERSION_1_0: &str = "1.0";

/// Reasons a signed message is rejected.
///
/// [`name`](Self::name) returns the problem names of the OAuth problem
/// reporting extension, which is what gets logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OAuthProblem {
    /// A required `oauth_*` parameter is missing.
    #[error("parameter absent: {parameter}")]
    ParameterAbsent { parameter: String },

    /// A parameter is present but unusable.
    #[error("parameter rejected: {parameter}={value}")]
    ParameterRejected { parameter: String, value: String },

    /// `oauth_version` is not `1.0`.
    #[error("oauth version rejected: {version}")]
    VersionRejected { version: String },

    /// The signature method is unknown or not accepted.
    #[error("signature method rejected: {method}")]
    SignatureMethodRejected { method: String },

    /// The timestamp lies outside the accepted window.
    #[error("timestamp refused: {timestamp} (now {now})")]
    TimestampRefused { timestamp: i64, now: i64 },

    /// The signature does not match the message.
    #[error("signature invalid")]
    SignatureInvalid,

    /// The request URL cannot be normalized.
    #[error("malformed url {url}: {reason}")]
    MalformedUrl { url: String, reason: String },
}

impl OAuthProblem {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParameterAbsent { .. } => "parameter_absent",
            Self::ParameterRejected { .. } => "parameter_rejected",
            Self::VersionRejected { .. } => "version_rejected",
            Self::SignatureMethodRejected { .. } => "signature_method_rejected",
            Self::TimestampRefused { .. } => "timestamp_refused",
            Self::SignatureInvalid => "signature_invalid",
            Self::MalformedUrl { .. } => "malformed_url",
        }
    }

    fn absent(parameter: &str) -> Self {
        Self::ParameterAbsent {
            parameter: parameter.to_string(),
        }
    }
}

/// A signed request as seen by the signature validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthMessage {
    method: String,
    url: String,
    parameters: Vec<(String, String)>,
}

impl OAuthMessage {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        parameters: Vec<(String, String)>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            parameters,
        }
    }

    /// Build a message from a request and the URL its signature covers.
    ///
    /// OAuth parameters sent in an `Authorization: OAuth ...` header come
    /// first, followed by the form and query parameters. `realm` is dropped.
    ///
    /// The source already carries the query parameters, so the query and
    /// fragment of `url` are cut off to keep each pair signed once.
    pub fn from_source<S>(source: &S, url: &str) -> Result<Self, SourceError>
    where
        S: ParameterSource + ?Sized,
    {
        let mut parameters = match source.authorization() {
            Some(header) => parse_authorization_header(header)?,
            None => Vec::new(),
        };
        parameters.extend(source.parameters()?);

        let url = url.find(['?', '#']).map_or(url, |end| &url[..end]);
        Ok(Self::new(source.method(), url, parameters))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// First value of a parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// A parameter that must be present and non-empty.
    pub fn require(&self, name: &str) -> Result<&str, OAuthProblem> {
        match self.parameter(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(OAuthProblem::absent(name)),
        }
    }

    pub fn consumer_key(&self) -> Result<&str, OAuthProblem> {
        self.require(OAUTH_CONSUMER_KEY)
    }

    pub fn signature_method(&self) -> Result<SignatureMethod, OAuthProblem> {
        self.require(OAUTH_SIGNATURE_METHOD)?.parse()
    }

    pub fn signature(&self) -> Result<&str, OAuthProblem> {
        self.require(OAUTH_SIGNATURE)
    }
}

/// Consumer credentials a message is verified against.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthAccessor {
    consumer_key: String,
    consumer_secret: String,
    token_secret: String,
}

impl OAuthAccessor {
    /// One-legged credentials: no token secret. An empty secret is valid.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token_secret: String::new(),
        }
    }

    pub fn with_token_secret(mut self, token_secret: impl Into<String>) -> Self {
        self.token_secret = token_secret.into();
        self
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Key used by every signature method: `enc(consumer_secret)&enc(token_secret)`.
    pub fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        )
    }
}

impl std::fmt::Debug for OAuthAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthAccessor")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}
