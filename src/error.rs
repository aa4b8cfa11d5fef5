//!
//! Defines error types for capability issuance, verification and revocation.

/// A right-name or rights set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RightsError {
    /// A capability must grant at least one right.
    #[error("Rights set must not be empty")]
    Empty,
    /// The right-name is empty or contains a reserved character (`,`, `:`, whitespace or control).
    #[error("Invalid right name: {0:?}")]
    InvalidName(String),
}

/// The claims bytes could not be decoded.
///
/// Every decoding failure (missing field, wrong type, empty rights, bad expiry, ...)
/// collapses into this one kind so the verifier can tell "not a capability token"
/// apart from "token integrity failure".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed claims encoding: {0}")]
pub struct DecodeError(pub String);

/// The claims could not be serialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to encode claims: {0}")]
pub struct EncodeError(pub String);

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Signature verification failed: invalid signature")]
    InvalidSignature,
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
    #[error("Signing backend failure: {0}")]
    Signing(String),
    #[error("Unsupported algorithm suite: {0}")]
    UnsupportedAlgSuite(String),
}

/// Failure of a storage collaborator (registries, token store, revocation store).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
    /// Persisted data could not be read back.
    #[error("Corrupt storage entry: {0}")]
    Corrupt(String),
    /// A unique key was inserted twice.
    #[error("Entry already exists: {0}")]
    Conflict(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Errors raised by the signing authority. Both are fatal for the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    #[error(transparent)]
    Encoding(#[from] EncodeError),
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),
}

/// Errors returned by the issuance protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
    /// Subject or object lookup failed; which one is withheld.
    #[error("Subject or object not found")]
    NotFound,
    #[error("Invalid rights: {0}")]
    InvalidRights(#[from] RightsError),
    #[error("Issuance failed: {0}")]
    Authority(#[from] AuthorityError),
    #[error("Storage failure during issuance: {0}")]
    Storage(#[from] StoreError),
}

impl IssueError {
    /// True for the lookup failures (`SubjectNotFound`, `ObjectNotFound`, `NotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            IssueError::SubjectNotFound(_) | IssueError::ObjectNotFound(_) | IssueError::NotFound
        )
    }
}

/// Reasons a presented token is refused. All are final; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// Structural or transport-encoding failure.
    #[error("Malformed token")]
    MalformedToken,
    /// Authenticity failure. Treated as a security event.
    #[error("Token signature is invalid")]
    SignatureInvalid,
    #[error("Token expired")]
    Expired,
    #[error("Token revoked")]
    Revoked,
    #[error("Token does not grant the requested right")]
    InsufficientRights,
    /// The revocation store could not be consulted. Verification fails closed.
    #[error("Revocation registry unavailable: {0}")]
    RevocationUnavailable(StoreError),
}

impl Denial {
    /// Internal faults are the only denials not caused by the token itself.
    pub fn is_internal(&self) -> bool {
        matches!(self, Denial::RevocationUnavailable(_))
    }
}

/// Errors loading configuration or key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid key file: {0}")]
    Key(#[from] CryptoError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
