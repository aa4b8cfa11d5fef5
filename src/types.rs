//! Shared identifier types, algorithm suites and token policy constants.

use rand_core::{OsRng, RngCore};
use std::fmt;
use std::str::FromStr;

/// Separator between the claims encoding and the hex signature in a token.
pub const TOKEN_DELIMITER: &str = "::";

/// Fixed token lifetime, in seconds. Not derived from caller input.
pub const TOKEN_LIFETIME_SECS: i64 = 30 * 60;

/// Number of random bytes in a nonce (rendered as twice as many hex chars).
pub const NONCE_LEN: usize = 32;

/// Expiry timestamp layout used in the claims encoding (UTC, second precision).
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The token lifetime as a `chrono::Duration`.
pub fn token_lifetime() -> chrono::Duration {
    chrono::Duration::seconds(TOKEN_LIFETIME_SECS)
}

/// Algorithm Suite for token signatures.
///
/// The wire format carries no suite tag; issuer and verifier are provisioned
/// with the same suite out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgSuite {
    /// Ed25519 signatures.
    #[default]
    Classic,
    /// ECDSA over NIST P-256 with SHA-256.
    Fips,
}

impl FromStr for AlgSuite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "ed25519" => Ok(AlgSuite::Classic),
            "fips" | "p256" | "ecdsa-p256" => Ok(AlgSuite::Fips),
            other => Err(format!("Invalid AlgSuite: {}", other)),
        }
    }
}

impl fmt::Display for AlgSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgSuite::Classic => f.write_str("classic"),
            AlgSuite::Fips => f.write_str("fips"),
        }
    }
}

/// Stable identifier of a subject, assigned by the identity registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

/// Stable identifier of a protected object, assigned by the object registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-issuance random value. Makes otherwise identical grants distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce(String);

impl Nonce {
    /// Draws `NONCE_LEN` bytes from the operating-system CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Nonce(hex::encode(bytes))
    }

    /// Wraps an existing nonce string, e.g. one read back from a token.
    /// Returns `None` unless it is non-empty lowercase hex, which keeps the
    /// token delimiter out of any claims encoding.
    pub fn from_string(value: String) -> Option<Self> {
        let valid = !value.is_empty()
            && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Some(Nonce(value))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nonce {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Nonce::from_string(value).ok_or_else(|| "nonce must be non-empty lowercase hex".to_owned())
    }
}

impl From<Nonce> for String {
    fn from(nonce: Nonce) -> Self {
        nonce.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
