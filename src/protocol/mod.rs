//! Request-level protocols.
//!
//! * [`IssuanceProtocol`] runs in the trusted authority process: it resolves
//!   names, signs, and records the issued token.
//! * [`VerificationProtocol`] runs wherever resources are held: it needs only
//!   the public key and the revocation store.
//! * [`RevocationProtocol`] records revocations and flags the audit record.
//!
//! Each request is independent; the protocols hold read-only key material and
//! `Send + Sync` store handles, so one instance can serve concurrent callers.

pub mod issuance;
pub mod revocation;
pub mod verification;

#[cfg(test)]
mod tests;

pub use issuance::{IssuanceProtocol, NotFoundPolicy};
pub use revocation::RevocationProtocol;
pub use verification::VerificationProtocol;
