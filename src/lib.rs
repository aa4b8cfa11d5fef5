#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Captoken-Core issues, verifies and revokes signed capability tokens.
//!
//! A token binds a subject, an object and a set of rights to an expiry and a
//! random nonce, and is signed by a trusted authority. Resource servers check
//! tokens locally with the authority's public key plus a shared revocation
//! store; they never need the directory that issued them.
//!
//! Wire form: `<canonical claims JSON>::<lowercase hex signature>`.

// Shared identifiers, suites and constants.
pub mod types;

// Rights sets and the sufficiency check.
pub mod rights;

// Claims, tokens, grants and audit records.
pub mod primitives;

pub use primitives::*;

// Canonical claims encoding.
pub mod encoding;

// Signing suites and key files.
pub mod crypto;

pub mod authority;
pub mod verifier;
pub mod revocation;
pub mod registry;

// Issuance, verification and revocation requests.
pub mod protocol;

pub mod time;
pub mod config;
pub mod error;

pub use authority::SigningAuthority;
pub use config::Config;
pub use error::{ConfigError, Denial, IssueError, StoreError};
pub use protocol::{IssuanceProtocol, NotFoundPolicy, RevocationProtocol, VerificationProtocol};
pub use revocation::{Ack, FileRevocationStore, MemoryRevocationStore, RevocationDigest, RevocationRegistry};
pub use rights::Rights;
pub use types::{AlgSuite, ObjectId, SubjectId};
pub use verifier::Verifier;

/// Installs a `tracing` subscriber that writes to stderr, filtered by
/// `RUST_LOG` (default `info`). Calling it twice is harmless.
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
