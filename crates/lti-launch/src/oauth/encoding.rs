use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::request::SourceError;

/// RFC 5849 §3.6: everything except `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string the way OAuth 1.0a signatures require.
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Decode `%XX` sequences. `+` is kept literally, unlike form decoding.
pub fn percent_decode(value: &str) -> Result<String, std::str::Utf8Error> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
}

/// Extract the OAuth parameters of an `Authorization: OAuth ...` header.
///
/// Headers using another scheme yield no parameters. `realm` is not a
/// signed parameter and is dropped.
pub fn parse_authorization_header(header: &str) -> Result<Vec<(String, String)>, SourceError> {
    let header = header.trim();
    let Some(scheme_end) = header.find(char::is_whitespace) else {
        return Ok(Vec::new());
    };
    if !header[..scheme_end].eq_ignore_ascii_case("OAuth") {
        return Ok(Vec::new());
    }

    let mut parameters = Vec::new();
    for pair in header[scheme_end..].split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (name, value) = pair.split_once('=').ok_or_else(|| SourceError::Malformed {
            message: format!("authorization parameter without value: {}", pair),
        })?;
        let name = name.trim();
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        if name.eq_ignore_ascii_case("realm") {
            continue;
        }

        let decode = |raw: &str| {
            percent_decode(raw).map_err(|e| SourceError::Malformed {
                message: format!("authorization parameter is not valid UTF-8: {}", e),
            })
        };
        parameters.push((decode(name)?, decode(value)?));
    }

    Ok(parameters)
}
