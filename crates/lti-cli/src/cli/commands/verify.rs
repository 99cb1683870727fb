//! `lti verify` - Verify a launch request.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use lti_launch::{FormParameters, LaunchVerifier, LtiVerificationResult, VerifierConfig};

use crate::exit_codes::{BAD_REQUEST, CONFIG_ERROR, SUCCESS};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Absolute launch URL the consumer signed
    #[arg(long)]
    pub url: String,

    /// Shared secret of the consumer key
    #[arg(long, env = "LTI_SHARED_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// HTTP method of the launch
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// Form-encoded launch body (reads stdin when omitted)
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// Raw `Authorization` header carrying the OAuth parameters
    #[arg(long)]
    pub authorization: Option<String>,

    /// Rebase the launch URL onto this host before verifying
    #[arg(long)]
    pub public_base_url: Option<String>,

    /// Max clock skew for `oauth_timestamp` in seconds, 0 disables
    #[arg(long)]
    pub timestamp_window: Option<u64>,

    /// Accept PLAINTEXT signatures
    #[arg(long)]
    pub allow_plaintext: bool,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn cmd_verify(args: VerifyArgs) -> i32 {
    match run_verify(&args) {
        Ok(result) => {
            if !args.quiet {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("error: failed to serialize result: {e}");
                        return CONFIG_ERROR;
                    }
                }
            }
            if result.is_success() {
                SUCCESS
            } else {
                BAD_REQUEST
            }
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("error: {e:#}");
            }
            CONFIG_ERROR
        }
    }
}

fn run_verify(args: &VerifyArgs) -> Result<LtiVerificationResult> {
    let secret = args
        .secret
        .as_deref()
        .context("no shared secret: pass --secret or set LTI_SHARED_SECRET")?;

    let body = read_body(args.body.as_ref())?;
    let mut request = FormParameters::from_form_strict(&body)
        .context("failed to decode launch body")?
        .with_method(args.method.to_ascii_uppercase());
    // Query parameters are signed like form parameters
    if let Some((_, query)) = args.url.split_once('?') {
        let query = query.split('#').next().unwrap_or_default();
        request.extend_form(query.as_bytes());
    }
    if let Some(header) = &args.authorization {
        request = request.with_authorization(header.clone());
    }
    tracing::debug!(parameters = request.len(), "decoded launch body");

    let verifier = LaunchVerifier::from_config(&config(args));
    Ok(verifier.verify(&request, &args.url, secret))
}

/// Environment config with command-line overrides.
fn config(args: &VerifyArgs) -> VerifierConfig {
    let mut config = VerifierConfig::from_env();
    if let Some(window) = args.timestamp_window {
        config = config.with_timestamp_window(window);
    }
    if args.allow_plaintext {
        config = config.with_allow_plaintext(true);
    }
    if let Some(base) = &args.public_base_url {
        config = config.with_public_base_url(base.clone());
    }
    config
}

/// Raw body with any trailing line break removed.
fn read_body(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut body = match path {
        Some(path) => fs::read(path)
            .with_context(|| format!("failed to read launch body: {}", path.display()))?,
        None => {
            let mut body = Vec::new();
            std::io::stdin()
                .read_to_end(&mut body)
                .context("failed to read launch body from stdin")?;
            body
        }
    };
    while matches!(body.last(), Some(b'\n' | b'\r')) {
        body.pop();
    }
    Ok(body)
}
