//! Tool-side verification of LTI 1.x launch requests.
//!
//! A tool consumer (an LMS) launches a tool by POSTing a form signed with
//! OAuth 1.0a. This crate provides:
//!
//! - OAuth 1.0a signature verification (`HMAC-SHA1`, `HMAC-SHA256`, `PLAINTEXT`)
//! - Extraction of the launch record (user, roles, context, return URL)
//! - A single failure category for callers, with internal causes in the logs
//! - URL rebasing for tools running behind a proxy
//!
//! # Quick Start
//!
//! ```
//! use lti_launch::{validate_message, FormParameters};
//!
//! let request = FormParameters::from_form(b"user_id=pgray&roles=Instructor");
//! let result = validate_message(&request, "https://tool.example.com/launch", "secret");
//!
//! // Unsigned request
//! assert!(!result.is_success());
//! assert_eq!(result.error(), Some(lti_launch::LtiError::BadRequest));
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `LTI_TIMESTAMP_WINDOW_SECS` | Max clock skew for `oauth_timestamp`, `0` disables (default: 300) |
//! | `LTI_ALLOW_PLAINTEXT` | Accept `PLAINTEXT` signatures (TLS only) |
//! | `LTI_PUBLIC_BASE_URL` | Rebase launch URLs onto this host before verifying |

pub mod config;
pub mod error;
pub mod launch;
pub mod oauth;
pub mod real_path;
pub mod request;
pub mod result;
pub mod verify;

// Re-export main types
pub use config::VerifierConfig;
pub use error::{LaunchFailure, LaunchResult, LtiError};
pub use launch::{parse_roles, LtiLaunch, User};
pub use oauth::{
    OAuthAccessor, OAuthMessage, OAuthProblem, SignatureMethod, SignatureValidator,
    SimpleValidator,
};
pub use real_path::{get_real_path, rebase_url, RealPathError};
pub use request::{FormParameters, ParameterSource, SourceError};
pub use result::LtiVerificationResult;
pub use verify::{validate_message, LaunchVerifier, LtiVerifier};
