//! Launch verification (signature check, then record extraction).

use crate::config::VerifierConfig;
use crate::error::{LaunchFailure, LaunchResult};
use crate::launch::LtiLaunch;
use crate::oauth::{base_string, OAuthAccessor, OAuthMessage, SignatureValidator, SimpleValidator};
use crate::real_path::rebase_url;
use crate::request::ParameterSource;
use crate::result::LtiVerificationResult;

/// Verify a launch request with the default validator.
///
/// Never fails: every problem with the request, its URL or its signature
/// becomes a failed result carrying [`LtiError::BadRequest`](crate::LtiError).
///
/// # Arguments
///
/// * `source` - Parameters of the incoming request
/// * `url` - Absolute URL the consumer signed
/// * `secret` - Shared secret of the consumer key; may be empty
pub fn validate_message<S>(source: &S, url: &str, secret: &str) -> LtiVerificationResult
where
    S: ParameterSource + ?Sized,
{
    LaunchVerifier::new().verify(source, url, secret)
}

/// Object-safe verification seam for host layers.
pub trait LtiVerifier {
    fn verify(&self, source: &dyn ParameterSource, url: &str, secret: &str)
        -> LtiVerificationResult;
}

/// Verifies launches with an injected [`SignatureValidator`].
///
/// Holds no per-call state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct LaunchVerifier<V = SimpleValidator> {
    validator: V,
    public_base_url: Option<String>,
}

impl LaunchVerifier<SimpleValidator> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a verifier from configuration.
    pub fn from_config(config: &VerifierConfig) -> Self {
        Self {
            validator: config.validator(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

impl<V: SignatureValidator> LaunchVerifier<V> {
    /// Use a custom validator.
    pub fn with_validator(validator: V) -> Self {
        Self {
            validator,
            public_base_url: None,
        }
    }

    /// Rebase launch URLs onto this public base before verifying.
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into());
        self
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Verify a launch and assemble the result.
    pub fn verify<S>(&self, source: &S, url: &str, secret: &str) -> LtiVerificationResult
    where
        S: ParameterSource + ?Sized,
    {
        match self.try_verify(source, url, secret) {
            Ok(launch) => LtiVerificationResult::success(launch),
            Err(failure) => {
                tracing::warn!(
                    cause = failure.cause(),
                    error = %failure,
                    url,
                    "rejected LTI launch"
                );
                LtiVerificationResult::failure(failure.kind())
            }
        }
    }

    /// Verify a launch, keeping the internal failure cause.
    ///
    /// # Verification Steps
    ///
    /// 1. Build the OAuth message from the request and URL
    /// 2. Build the signature base string
    /// 3. Read the consumer key and pair it with the shared secret
    /// 4. Validate the signature
    /// 5. Extract the launch record
    ///
    /// Each step runs only if the previous one succeeded.
    pub fn try_verify<S>(&self, source: &S, url: &str, secret: &str) -> LaunchResult<LtiLaunch>
    where
        S: ParameterSource + ?Sized,
    {
        let url = self.launch_url(url)?;

        // 1. Message
        let message = OAuthMessage::from_source(source, &url)?;

        // 2. Base string
        let base = base_string(&message)?;
        tracing::debug!(base_string = %base, "computed OAuth base string");

        // 3. Credentials
        let consumer_key = message.consumer_key().map_err(LaunchFailure::ConsumerKey)?;
        let accessor = OAuthAccessor::new(consumer_key, secret);

        // 4. Signature
        self.validator.validate(&message, &accessor)?;

        // 5. Launch record
        let launch = LtiLaunch::from_source(source);
        tracing::info!(
            consumer_key,
            user_id = %launch.user.id,
            "verified LTI launch"
        );
        Ok(launch)
    }

    fn launch_url(&self, url: &str) -> LaunchResult<String> {
        let Some(base) = &self.public_base_url else {
            return Ok(url.to_string());
        };
        rebase_url(url, base).map_err(|e| LaunchFailure::MalformedUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<V: SignatureValidator> LtiVerifier for LaunchVerifier<V> {
    fn verify(
        &self,
        source: &dyn ParameterSource,
        url: &str,
        secret: &str,
    ) -> LtiVerificationResult {
        LaunchVerifier::verify(self, source, url, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LtiError;
    use crate::oauth::{OAuthProblem, SignatureMethod};
    use crate::request::{FormParameters, SourceError};

    const URL: &str = "https://example.com/lti-launch";

    fn accept(_: &OAuthMessage, _: &OAuthAccessor) -> Result<(), OAuthProblem> {
        Ok(())
    }

    fn launch_params() -> FormParameters {
        [
            ("oauth_consumer_key", "key"),
            ("user_id", "pgray"),
            ("roles", "instructor, teacher,administrator"),
            ("lti_version", "lpv1"),
            ("lti_message_type", "lti"),
            ("resource_link_id", "12345"),
            ("context_id", "9876"),
            ("launch_presentation_return_url", "http://example.com/return"),
            ("tool_consumer_instance_guid", "instance_id"),
        ]
        .into_iter()
        .collect()
    }

    /// Source whose body cannot be read.
    struct BrokenSource;

    impl ParameterSource for BrokenSource {
        fn parameter(&self, _name: &str) -> Option<&str> {
            None
        }

        fn parameters(&self) -> Result<Vec<(String, String)>, SourceError> {
            Err(SourceError::Io(std::io::Error::other("io exception")))
        }
    }

    #[test]
    fn test_source_read_failure_is_bad_request() {
        let verifier = LaunchVerifier::with_validator(accept);
        let result = verifier.verify(&BrokenSource, URL, "secret");

        assert_eq!(result.error(), Some(LtiError::BadRequest));
        assert!(!result.is_success());
        assert!(matches!(
            verifier.try_verify(&BrokenSource, URL, "secret"),
            Err(LaunchFailure::Source(_))
        ));
    }

    #[test]
    fn test_missing_consumer_key_is_bad_request() {
        let verifier = LaunchVerifier::with_validator(accept);
        let source = FormParameters::new().with_parameter("user_id", "pgray");

        let result = verifier.verify(&source, URL, "secret");
        assert_eq!(result.error(), Some(LtiError::BadRequest));
        assert!(matches!(
            verifier.try_verify(&source, URL, "secret"),
            Err(LaunchFailure::ConsumerKey(_))
        ));
    }

    #[test]
    fn test_malformed_url_short_circuits_before_validation() {
        let validator_calls = std::cell::Cell::new(0);
        let counting = |_: &OAuthMessage, _: &OAuthAccessor| -> Result<(), OAuthProblem> {
            validator_calls.set(validator_calls.get() + 1);
            Ok(())
        };
        let verifier = LaunchVerifier::with_validator(counting);

        let result = verifier.verify(&launch_params(), "not a url", "secret");

        assert_eq!(result.error(), Some(LtiError::BadRequest));
        assert!(result.launch().is_none());
        assert_eq!(validator_calls.get(), 0);
    }

    #[test]
    fn test_validator_errors_are_bad_request() {
        let problems = [
            OAuthProblem::SignatureInvalid,
            OAuthProblem::TimestampRefused {
                timestamp: 0,
                now: 1_000,
            },
            OAuthProblem::MalformedUrl {
                url: URL.to_string(),
                reason: "failed".to_string(),
            },
            OAuthProblem::ParameterAbsent {
                parameter: "oauth_nonce".to_string(),
            },
        ];

        for problem in problems {
            let expected = problem.clone();
            let verifier = LaunchVerifier::with_validator(
                move |_: &OAuthMessage, _: &OAuthAccessor| -> Result<(), OAuthProblem> {
                    Err(expected.clone())
                },
            );

            let result = verifier.verify(&launch_params(), URL, "secret");
            assert_eq!(result.error(), Some(LtiError::BadRequest), "{problem}");
            assert!(result.launch().is_none(), "{problem}");
        }
    }

    #[test]
    fn test_accepted_launch_is_extracted() {
        let verifier = LaunchVerifier::with_validator(accept);
        let result = verifier.verify(&launch_params(), URL, "secret1");

        assert_eq!(result.error(), None);
        assert!(result.is_success());
        let launch = result.launch().expect("launch record");
        assert_eq!(launch.user.id, "pgray");
        assert_eq!(launch.user.roles, vec!["instructor", "teacher", "administrator"]);
        assert_eq!(launch.version.as_deref(), Some("lpv1"));
        assert_eq!(launch.message_type.as_deref(), Some("lti"));
        assert_eq!(launch.resource_link_id.as_deref(), Some("12345"));
        assert_eq!(launch.context_id.as_deref(), Some("9876"));
        assert_eq!(
            launch.launch_presentation_return_url.as_deref(),
            Some("http://example.com/return")
        );
        assert_eq!(
            launch.tool_consumer_instance_guid.as_deref(),
            Some("instance_id")
        );
    }

    #[test]
    fn test_validator_sees_consumer_key_and_secret() {
        let check = |message: &OAuthMessage, accessor: &OAuthAccessor| -> Result<(), OAuthProblem> {
            assert_eq!(message.url(), URL);
            assert_eq!(accessor.consumer_key(), "key");
            assert_eq!(accessor.signing_key(), "&");
            Ok(())
        };
        let result = LaunchVerifier::with_validator(check).verify(&launch_params(), URL, "");
        assert!(result.is_success());
    }

    #[test]
    fn test_public_base_url_rebases_before_signing_check() {
        let check = |message: &OAuthMessage, _: &OAuthAccessor| -> Result<(), OAuthProblem> {
            assert_eq!(message.url(), "https://tool.example.com/lti-launch");
            Ok(())
        };
        let verifier =
            LaunchVerifier::with_validator(check).with_public_base_url("https://tool.example.com");

        let result = verifier.verify(&launch_params(), "http://localhost:8080/lti-launch", "s");
        assert!(result.is_success());

        let broken = LaunchVerifier::with_validator(accept).with_public_base_url("not a base");
        assert!(matches!(
            broken.try_verify(&launch_params(), URL, "s"),
            Err(LaunchFailure::MalformedUrl { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = VerifierConfig::default()
            .with_allow_plaintext(true)
            .with_timestamp_window(0);
        let verifier = LaunchVerifier::from_config(&config);

        assert_eq!(verifier.validator().timestamp_window(), None);
        assert!(verifier
            .validator()
            .methods()
            .contains(&SignatureMethod::Plaintext));
    }

    #[test]
    fn test_dyn_verifier() {
        let verifier: Box<dyn LtiVerifier> = Box::new(LaunchVerifier::with_validator(accept));
        let params = launch_params();
        assert!(verifier.verify(&params, URL, "secret").is_success());
    }
}
