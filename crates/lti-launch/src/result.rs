//! Outcome of a launch verification.

use serde::{Deserialize, Serialize};

use crate::error::LtiError;
use crate::launch::LtiLaunch;

/// Outcome of [`validate_message`](crate::validate_message).
///
/// Exactly one of [`error`](Self::error) and [`launch`](Self::launch) is
/// present, and [`is_success`](Self::is_success) says which. The constructors are
/// the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResultRepr", into = "ResultRepr")]
pub struct LtiVerificationResult {
    outcome: Result<LtiLaunch, LtiError>,
}

impl LtiVerificationResult {
    pub fn success(launch: LtiLaunch) -> Self {
        Self {
            outcome: Ok(launch),
        }
    }

    pub fn failure(error: LtiError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<LtiError> {
        self.outcome.as_ref().err().copied()
    }

    pub fn launch(&self) -> Option<&LtiLaunch> {
        self.outcome.as_ref().ok()
    }

    pub fn into_result(self) -> Result<LtiLaunch, LtiError> {
        self.outcome
    }
}

impl From<Result<LtiLaunch, LtiError>> for LtiVerificationResult {
    fn from(outcome: Result<LtiLaunch, LtiError>) -> Self {
        Self { outcome }
    }
}

/// Wire shape: `{ "success": bool, "error": ..., "ltiLaunchResult": ... }`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRepr {
    success: bool,
    error: Option<LtiError>,
    lti_launch_result: Option<LtiLaunch>,
}

impl From<LtiVerificationResult> for ResultRepr {
    fn from(result: LtiVerificationResult) -> Self {
        match result.outcome {
            Ok(launch) => Self {
                success: true,
                error: None,
                lti_launch_result: Some(launch),
            },
            Err(error) => Self {
                success: false,
                error: Some(error),
                lti_launch_result: None,
            },
        }
    }
}

impl From<ResultRepr> for LtiVerificationResult {
    // An inconsistent document is read as a failure: a launch is only
    // trusted when `success` is true and a record is present.
    fn from(repr: ResultRepr) -> Self {
        match (repr.success, repr.lti_launch_result) {
            (true, Some(launch)) => Self::success(launch),
            _ => Self::failure(repr.error.unwrap_or(LtiError::BadRequest)),
        }
    }
}
