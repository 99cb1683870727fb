//! Read-only access to the parameters of an incoming launch request.
//!
//! The host HTTP layer owns the request; verification only needs its method,
//! its form/query parameters and, when the consumer sent OAuth parameters in a
//! header, the raw `Authorization` value.

/// Failure while reading the request's parameters.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure while reading the request body.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The body or query string could not be decoded.
    #[error("malformed request: {message}")]
    Malformed { message: String },
}

/// Accessor over a launch request's parameters.
///
/// Implementations are read-only views; verification never mutates them.
pub trait ParameterSource {
    /// HTTP method of the request, `POST` for every LTI 1.x launch.
    fn method(&self) -> &str {
        "POST"
    }

    /// First value of a named form or query parameter. Names are case-sensitive.
    fn parameter(&self, name: &str) -> Option<&str>;

    /// Every form and query parameter in arrival order.
    fn parameters(&self) -> Result<Vec<(String, String)>, SourceError>;

    /// Raw `Authorization` header, if the request carried one.
    fn authorization(&self) -> Option<&str> {
        None
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    fn method(&self) -> &str {
        (**self).method()
    }

    fn parameter(&self, name: &str) -> Option<&str> {
        (**self).parameter(name)
    }

    fn parameters(&self) -> Result<Vec<(String, String)>, SourceError> {
        (**self).parameters()
    }

    fn authorization(&self) -> Option<&str> {
        (**self).authorization()
    }
}

/// In-memory parameter source decoded from a form body and/or query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParameters {
    method: String,
    params: Vec<(String, String)>,
    authorization: Option<String>,
}

impl Default for FormParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl FormParameters {
    /// Empty `POST` request.
    pub fn new() -> Self {
        Self {
            method: "POST".to_string(),
            params: Vec::new(),
            authorization: None,
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Self {
        let mut params = Self::new();
        params.extend_form(body);
        params
    }

    /// Decode a form body whose raw bytes and percent-decoded pairs must
    /// all be valid UTF-8.
    ///
    /// [`from_form`](Self::from_form) replaces invalid sequences; this rejects
    /// them so a corrupted capture is not silently verified against.
    pub fn from_form_strict(body: &[u8]) -> Result<Self, SourceError> {
        let raw = std::str::from_utf8(body).map_err(|e| SourceError::Malformed {
            message: format!("form body is not valid UTF-8: {}", e),
        })?;
        for pair in raw.split('&') {
            percent_encoding::percent_decode_str(pair)
                .decode_utf8()
                .map_err(|e| SourceError::Malformed {
                    message: format!("form parameter is not valid UTF-8 once decoded: {}", e),
                })?;
        }
        Ok(Self::from_form(body))
    }

    /// Append parameters decoded from a form body or query string.
    pub fn extend_form(&mut self, encoded: &[u8]) {
        self.params.extend(
            form_urlencoded::parse(encoded).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the raw `Authorization` header.
    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Iterate over `(name, value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters, repeated names counted separately.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

impl ParameterSource for FormParameters {
    fn method(&self) -> &str {
        &self.method
    }

    fn parameter(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn parameters(&self) -> Result<Vec<(String, String)>, SourceError> {
        Ok(self.params.clone())
    }

    fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }
}
