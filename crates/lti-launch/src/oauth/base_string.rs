//! Signature base string construction (RFC 5849 §3.4.1).

use url::Url;

use super::encoding::percent_encode;
use super::{OAuthMessage, OAuthProblem, OAUTH_SIGNATURE};

/// Build the signature base string of a message.
///
/// ```text
/// METHOD & enc(normalized url) & enc(normalized parameters)
/// ```
///
/// Query parameters carried on the message URL are signed alongside the
/// message parameters.
pub fn base_string(message: &OAuthMessage) -> Result<String, OAuthProblem> {
    let (url, mut parameters) = normalize_url(message.url())?;
    parameters.extend(message.parameters().iter().cloned());

    Ok(format!(
        "{}&{}&{}",
        percent_encode(&message.method().to_ascii_uppercase()),
        percent_encode(&url),
        percent_encode(&normalize_parameters(&parameters))
    ))
}

/// Normalize a request URL (§3.4.1.2).
///
/// Returns `scheme://host[:port]/path` with lowercase scheme and host and the
/// default port dropped, plus the decoded query parameters the URL carried.
pub fn normalize_url(raw: &str) -> Result<(String, Vec<(String, String)>), OAuthProblem> {
    let malformed = |reason: String| OAuthProblem::MalformedUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| malformed(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(malformed(format!("unsupported scheme: {}", url.scheme())));
    }
    let host = url
        .host_str()
        .ok_or_else(|| malformed("missing host".to_string()))?;

    let mut normalized = format!("{}://{}", url.scheme(), host.to_ascii_lowercase());
    // `Url::port` is `None` when the port is the scheme default
    if let Some(port) = url.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(if url.path().is_empty() { "/" } else { url.path() });

    let query = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok((normalized, query))
}

/// Normalize request parameters (§3.4.1.3.2).
///
/// `oauth_signature` is excluded. Names and values are encoded, sorted by
/// name then value, and joined as `name=value` pairs separated by `&`.
pub fn normalize_parameters(parameters: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = parameters
        .iter()
        .filter(|(name, _)| name != OAUTH_SIGNATURE)
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}
