use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{OAuthAccessor, OAuthProblem};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Supported `oauth_signature_method` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::HmacSha256 => "HMAC-SHA256",
            Self::Plaintext => "PLAINTEXT",
        }
    }

    /// Whether the method relies on timestamp and nonce for freshness.
    pub fn requires_timestamp(&self) -> bool {
        !matches!(self, Self::Plaintext)
    }

    /// Compute the signature of a base string.
    ///
    /// HMAC methods return standard base64; `PLAINTEXT` returns the signing
    /// key itself and ignores the base string.
    pub fn sign(&self, base_string: &str, accessor: &OAuthAccessor) -> String {
        let key = accessor.signing_key();
        match self {
            Self::HmacSha1 => {
                let mut mac =
                    HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
                mac.update(base_string.as_bytes());
                BASE64.encode(mac.finalize().into_bytes())
            }
            Self::HmacSha256 => {
                let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                    .expect("HMAC can take key of any size");
                mac.update(base_string.as_bytes());
                BASE64.encode(mac.finalize().into_bytes())
            }
            Self::Plaintext => key,
        }
    }

    /// Check a received signature in constant time.
    pub fn verify(
        &self,
        base_string: &str,
        signature: &str,
        accessor: &OAuthAccessor,
    ) -> Result<(), OAuthProblem> {
        let key = accessor.signing_key();
        match self {
            Self::HmacSha1 => {
                let expected = decode_signature(signature)?;
                let mut mac =
                    HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
                mac.update(base_string.as_bytes());
                mac.verify_slice(&expected)
                    .map_err(|_| OAuthProblem::SignatureInvalid)
            }
            Self::HmacSha256 => {
                let expected = decode_signature(signature)?;
                let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                    .expect("HMAC can take key of any size");
                mac.update(base_string.as_bytes());
                mac.verify_slice(&expected)
                    .map_err(|_| OAuthProblem::SignatureInvalid)
            }
            Self::Plaintext => {
                if bool::from(key.as_bytes().ct_eq(signature.as_bytes())) {
                    Ok(())
                } else {
                    Err(OAuthProblem::SignatureInvalid)
                }
            }
        }
    }
}

fn decode_signature(signature: &str) -> Result<Vec<u8>, OAuthProblem> {
    BASE64
        .decode(signature.trim())
        .map_err(|_| OAuthProblem::SignatureInvalid)
}

impl FromStr for SignatureMethod {
    type Err = OAuthProblem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "HMAC-SHA256" => Ok(Self::HmacSha256),
            "PLAINTEXT" => Ok(Self::Plaintext),
            other => Err(OAuthProblem::SignatureMethodRejected {
                method: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
