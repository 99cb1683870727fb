//! Rebasing of launch and return URLs onto a public host.
//!
//! Behind a proxy or during local testing, the URL a tool sees (`http://localhost/...`)
//! differs from the one the consumer signed (`https://tool.example.com/...`).

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealPathError {
    /// The URL could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL has no host to take or no path to keep.
    #[error("url has no {part}: {url}")]
    Incomplete { url: String, part: &'static str },
}

/// Combine the scheme, host and port of `new_base` with the path of `url`.
///
/// Any path on `new_base` is ignored, the query and fragment of `url` are
/// dropped, and the result always ends with a `/`.
///
/// ```
/// use lti_launch::get_real_path;
///
/// let fixed = get_real_path("http://localhost/path/blah/", "https://right.com").unwrap();
/// assert_eq!(fixed, "https://right.com/path/blah/");
/// ```
pub fn get_real_path(url: &str, new_base: &str) -> Result<String, RealPathError> {
    let (mut real, source) = rebased(url, new_base)?;
    real.push_str(source.path());
    if !real.ends_with('/') {
        real.push('/');
    }
    Ok(real)
}

/// Move `url` onto the scheme, host and port of `new_base`, keeping its path
/// and query exactly.
///
/// Unlike [`get_real_path`] no trailing slash is added, so the result can
/// stand in for the URL a consumer signed.
pub fn rebase_url(url: &str, new_base: &str) -> Result<String, RealPathError> {
    let (mut real, source) = rebased(url, new_base)?;
    real.push_str(source.path());
    if let Some(query) = source.query() {
        real.push('?');
        real.push_str(query);
    }
    Ok(real)
}

/// `scheme://host[:port]` of `new_base`, and the parsed `url`.
fn rebased(url: &str, new_base: &str) -> Result<(String, Url), RealPathError> {
    let source = parse(url)?;
    let base = parse(new_base)?;

    if source.cannot_be_a_base() {
        return Err(RealPathError::Incomplete {
            url: url.to_string(),
            part: "path",
        });
    }
    let host = base.host_str().ok_or_else(|| RealPathError::Incomplete {
        url: new_base.to_string(),
        part: "host",
    })?;

    let mut prefix = format!("{}://{}", base.scheme(), host);
    if let Some(port) = base.port() {
        prefix.push_str(&format!(":{}", port));
    }
    Ok((prefix, source))
}

fn parse(raw: &str) -> Result<Url, RealPathError> {
    Url::parse(raw.trim()).map_err(|e| RealPathError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_real_path() {
        let fixed = get_real_path("http://localhost/path/blah/", "https://right.com").unwrap();
        assert_eq!(fixed, "https://right.com/path/blah/");

        let fixed = get_real_path("https://localhost/path/blah/", "https://right.com").unwrap();
        assert_eq!(fixed, "https://right.com/path/blah/");

        let fixed = get_real_path("https://localhost/path/blah/", "http://right.com").unwrap();
        assert_eq!(fixed, "http://right.com/path/blah/");

        // Base with its own path
        let fixed =
            get_real_path("https://localhost/path/blah/", "https://right.com/path/blah").unwrap();
        assert_eq!(fixed, "https://right.com/path/blah/");
    }

    #[test]
    fn test_get_real_path_adds_trailing_slash() {
        let fixed = get_real_path("http://localhost:8080/lti/launch", "https://tool.example.com")
            .unwrap();
        assert_eq!(fixed, "https://tool.example.com/lti/launch/");

        let fixed = get_real_path("http://localhost", "https://tool.example.com").unwrap();
        assert_eq!(fixed, "https://tool.example.com/");
    }

    #[test]
    fn test_get_real_path_keeps_base_port_and_drops_query() {
        let fixed = get_real_path(
            "http://localhost/launch?debug=1#top",
            "https://tool.example.com:8443/ignored",
        )
        .unwrap();
        assert_eq!(fixed, "https://tool.example.com:8443/launch/");
    }

    #[test]
    fn test_get_real_path_is_idempotent() {
        let once = get_real_path("http://localhost/path/blah", "https://right.com").unwrap();
        let twice = get_real_path(&once, "https://right.com").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rebase_url_keeps_path_and_query() {
        let rebased = rebase_url(
            "http://localhost:8080/lti/launch?tool=1",
            "https://tool.example.com/ignored/",
        )
        .unwrap();
        assert_eq!(rebased, "https://tool.example.com/lti/launch?tool=1");
    }

    #[test]
    fn test_get_real_path_rejects_unparseable() {
        assert!(matches!(
            get_real_path("not a url", "https://right.com"),
            Err(RealPathError::InvalidUrl { .. })
        ));
        assert!(matches!(
            get_real_path("http://localhost/path", "right.com"),
            Err(RealPathError::InvalidUrl { .. })
        ));
        assert!(matches!(
            get_real_path("mailto:someone@example.com", "https://right.com"),
            Err(RealPathError::Incomplete { part: "path", .. })
        ));
    }
}
