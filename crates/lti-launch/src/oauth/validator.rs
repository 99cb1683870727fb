//! Signature validation seam.

use chrono::Utc;

use super::base_string::base_string;
use super::signature::SignatureMethod;
use super::{
    OAuthAccessor, OAuthMessage, OAuthProblem, OAUTH_NONCE, OAUTH_TIMESTAMP, OAUTH_VERSION,
    OAUTH_VERSION_1_0,
};

/// Default tolerated clock skew between consumer and tool, in seconds.
pub const DEFAULT_TIMESTAMP_WINDOW_SECS: u64 = 300;

/// Validates a signed message against consumer credentials.
///
/// Any error means the message is untrusted. Closures with the same
/// signature implement the trait, which is how tests substitute a fake.
pub trait SignatureValidator {
    fn validate(&self, message: &OAuthMessage, accessor: &OAuthAccessor)
        -> Result<(), OAuthProblem>;
}

impl<F> SignatureValidator for F
where
    F: Fn(&OAuthMessage, &OAuthAccessor) -> Result<(), OAuthProblem>,
{
    fn validate(
        &self,
        message: &OAuthMessage,
        accessor: &OAuthAccessor,
    ) -> Result<(), OAuthProblem> {
        self(message, accessor)
    }
}

/// Stateless validator for one-legged OAuth 1.0a messages.
///
/// Checks, in order: protocol version, presence of the signing parameters,
/// accepted signature method, timestamp freshness and the signature itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleValidator {
    timestamp_window: Option<u64>,
    methods: Vec<SignatureMethod>,
}

impl Default for SimpleValidator {
    fn default() -> Self {
        Self {
            timestamp_window: Some(DEFAULT_TIMESTAMP_WINDOW_SECS),
            methods: vec![SignatureMethod::HmacSha1, SignatureMethod::HmacSha256],
        }
    }
}

impl SimpleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum distance between `oauth_timestamp` and now; `None` disables the check.
    pub fn with_timestamp_window(mut self, window_secs: Option<u64>) -> Self {
        self.timestamp_window = window_secs;
        self
    }

    /// Replace the accepted signature methods.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = SignatureMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Accept one more signature method.
    pub fn allow_method(mut self, method: SignatureMethod) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    pub fn timestamp_window(&self) -> Option<u64> {
        self.timestamp_window
    }

    pub fn methods(&self) -> &[SignatureMethod] {
        &self.methods
    }

    /// Validate against an explicit clock, in unix seconds.
    pub fn validate_at(
        &self,
        message: &OAuthMessage,
        accessor: &OAuthAccessor,
        now: i64,
    ) -> Result<(), OAuthProblem> {
        if let Some(version) = message.parameter(OAUTH_VERSION) {
            if version != OAUTH_VERSION_1_0 {
                return Err(OAuthProblem::VersionRejected {
                    version: version.to_string(),
                });
            }
        }

        message.consumer_key()?;
        let method = message.signature_method()?;
        let signature = message.signature()?;

        if !self.methods.contains(&method) {
            return Err(OAuthProblem::SignatureMethodRejected {
                method: method.to_string(),
            });
        }

        if method.requires_timestamp() {
            let timestamp = message.require(OAUTH_TIMESTAMP)?;
            message.require(OAUTH_NONCE)?;
            self.check_timestamp(timestamp, now)?;
        }

        let base = base_string(message)?;
        method.verify(&base, signature, accessor)
    }

    fn check_timestamp(&self, raw: &str, now: i64) -> Result<(), OAuthProblem> {
        let timestamp: i64 = raw.parse().map_err(|_| OAuthProblem::ParameterRejected {
            parameter: OAUTH_TIMESTAMP.to_string(),
            value: raw.to_string(),
        })?;

        let Some(window) = self.timestamp_window else {
            return Ok(());
        };
        let window = i64::try_from(window).unwrap_or(i64::MAX);
        if timestamp.abs_diff(now) > window.unsigned_abs() {
            return Err(OAuthProblem::TimestampRefused { timestamp, now });
        }
        Ok(())
    }
}

impl SignatureValidator for SimpleValidator {
    fn validate(
        &self,
        message: &OAuthMessage,
        accessor: &OAuthAccessor,
    ) -> Result<(), OAuthProblem> {
        self.validate_at(message, accessor, Utc::now().timestamp())
    }
}
