//! Error types for launch verification.
//!
//! Two layers exist. [`LaunchFailure`] records *why* a launch was rejected and
//! is only ever logged. [`LtiError`] is the kind exposed on
//! [`LtiVerificationResult`](crate::LtiVerificationResult), and every
//! failure cause classifies to [`LtiError::BadRequest`].

use serde::{Deserialize, Serialize};

use crate::oauth::OAuthProblem;
use crate::request::SourceError;

/// Public failure kind of a launch verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum LtiError {
    /// The launch could not be trusted: malformed, unreadable or badly signed.
    BadRequest,
}

impl LtiError {
    /// Stable wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
        }
    }
}

impl std::fmt::Display for LtiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal cause of a rejected launch.
#[derive(Debug, thiserror::Error)]
pub enum LaunchFailure {
    /// Reading the request parameters failed.
    #[error("failed to read launch request: {0}")]
    Source(#[from] SourceError),

    /// The consumer key could not be read from the message.
    #[error("consumer key unavailable: {0}")]
    ConsumerKey(#[source] OAuthProblem),

    /// The launch URL could not be normalized for the base string.
    #[error("malformed launch url {url}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// The signature validator rejected the message.
    #[error("signature validation failed: {0}")]
    Signature(#[source] OAuthProblem),
}

impl LaunchFailure {
    /// Classify into the public error kind.
    ///
    /// All causes collapse into [`LtiError::BadRequest`]: the only correct
    /// recourse for a caller is to reject the launch.
    pub fn kind(&self) -> LtiError {
        match self {
            Self::Source(_) => LtiError::BadRequest,
            Self::ConsumerKey(_) => LtiError::BadRequest,
            Self::MalformedUrl { .. } => LtiError::BadRequest,
            Self::Signature(_) => LtiError::BadRequest,
        }
    }

    /// Short label of the cause, used as a structured log field.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::ConsumerKey(_) => "consumer_key",
            Self::MalformedUrl { .. } => "malformed_url",
            Self::Signature(problem) => problem.name(),
        }
    }
}

impl From<&LaunchFailure> for LtiError {
    fn from(failure: &LaunchFailure) -> Self {
        failure.kind()
    }
}

impl From<OAuthProblem> for LaunchFailure {
    fn from(problem: OAuthProblem) -> Self {
        match problem {
            OAuthProblem::MalformedUrl { url, reason } => Self::MalformedUrl { url, reason },
            other => Self::Signature(other),
        }
    }
}

/// Result type for the individual verification steps.
pub type LaunchResult<T> = Result<T, LaunchFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cause_is_bad_request() {
        let failures = [
            LaunchFailure::Source(SourceError::Io(std::io::Error::other("io exception"))),
            LaunchFailure::ConsumerKey(OAuthProblem::ParameterAbsent {
                parameter: "oauth_consumer_key".to_string(),
            }),
            LaunchFailure::MalformedUrl {
                url: "::".to_string(),
                reason: "relative URL without a base".to_string(),
            },
            LaunchFailure::Signature(OAuthProblem::SignatureInvalid),
            LaunchFailure::Signature(OAuthProblem::TimestampRefused {
                timestamp: 0,
                now: 1_000,
            }),
        ];

        for failure in &failures {
            assert_eq!(failure.kind(), LtiError::BadRequest, "{failure}");
            assert_eq!(LtiError::from(failure), LtiError::BadRequest);
        }
    }

    #[test]
    fn test_malformed_url_problem_keeps_its_own_cause() {
        let failure = LaunchFailure::from(OAuthProblem::MalformedUrl {
            url: "ftp://example.com".to_string(),
            reason: "unsupported scheme".to_string(),
        });
        assert!(matches!(failure, LaunchFailure::MalformedUrl { .. }));
        assert_eq!(failure.cause(), "malformed_url");

        let failure = LaunchFailure::from(OAuthProblem::SignatureInvalid);
        assert_eq!(failure.cause(), "signature_invalid");
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(LtiError::BadRequest.to_string(), "BAD_REQUEST");
        assert_eq!(
            serde_json::to_string(&LtiError::BadRequest).unwrap(),
            "\"BAD_REQUEST\""
        );
    }
}
