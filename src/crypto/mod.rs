//!
//! Cryptographic abstraction layer.
//!
//! Signing and verification sit behind two traits so the issuing side and the
//! verifying side never share a type: a [`TokenVerifier`] can only ever be
//! built from public key material.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::CryptoError;
use crate::types::AlgSuite;

/// Produces signatures over claims encodings. Held only by the signing authority.
pub trait TokenSigner: Send + Sync {
    /// Signs `message`, returning raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Checks signatures with public key material only.
pub trait TokenVerifier: Send + Sync {
    /// Returns `Ok(())` only for a valid signature over `message`.
    /// Every failure, including a signature of the wrong length, is
    /// `CryptoError::InvalidSignature`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError>;
}

impl<T: TokenSigner + ?Sized> TokenSigner for Arc<T> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).sign(message)
    }
}

impl<T: TokenVerifier + ?Sized> TokenVerifier for Arc<T> {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        (**self).verify(message, signature)
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// Module for the CLASSIC Algorithm Suite (Ed25519)
pub mod classic;

// Module for the FIPS Algorithm Suite (ECDSA P-256 / SHA-256)
pub mod fips;

// Key generation and key files
pub mod keys;

pub use classic::{Ed25519Signer, Ed25519Verifier};
pub use fips::{P256Signer, P256Verifier};

/// A signer for whichever suite the deployment is configured with.
#[derive(Clone)]
pub enum SuiteSigner {
    Classic(Ed25519Signer),
    Fips(P256Signer),
}

impl SuiteSigner {
    /// Generates a fresh private key from the OS CSPRNG.
    pub fn generate(suite: AlgSuite) -> Self {
        match suite {
            AlgSuite::Classic => SuiteSigner::Classic(Ed25519Signer::generate()),
            AlgSuite::Fips => SuiteSigner::Fips(P256Signer::generate()),
        }
    }

    pub fn from_bytes(suite: AlgSuite, secret: &[u8]) -> Result<Self, CryptoError> {
        Ok(match suite {
            AlgSuite::Classic => SuiteSigner::Classic(Ed25519Signer::from_bytes(secret)?),
            AlgSuite::Fips => SuiteSigner::Fips(P256Signer::from_bytes(secret)?),
        })
    }

    pub fn suite(&self) -> AlgSuite {
        match self {
            SuiteSigner::Classic(_) => AlgSuite::Classic,
            SuiteSigner::Fips(_) => AlgSuite::Fips,
        }
    }

    /// Raw private key bytes. Only for writing key files.
    pub fn secret_bytes(&self) -> Vec<u8> {
        match self {
            SuiteSigner::Classic(s) => s.to_bytes(),
            SuiteSigner::Fips(s) => s.to_bytes(),
        }
    }

    /// The matching public half.
    pub fn verifier(&self) -> SuiteVerifier {
        match self {
            SuiteSigner::Classic(s) => SuiteVerifier::Classic(s.verifier()),
            SuiteSigner::Fips(s) => SuiteVerifier::Fips(s.verifier()),
        }
    }
}

impl std::fmt::Debug for SuiteSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SuiteSigner").field(&self.suite()).finish()
    }
}

impl TokenSigner for SuiteSigner {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            SuiteSigner::Classic(s) => s.sign(message),
            SuiteSigner::Fips(s) => s.sign(message),
        }
    }
}

/// A verifier for whichever suite the deployment is configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteVerifier {
    Classic(Ed25519Verifier),
    Fips(P256Verifier),
}

impl SuiteVerifier {
    pub fn from_bytes(suite: AlgSuite, public: &[u8]) -> Result<Self, CryptoError> {
        Ok(match suite {
            AlgSuite::Classic => SuiteVerifier::Classic(Ed25519Verifier::from_bytes(public)?),
            AlgSuite::Fips => SuiteVerifier::Fips(P256Verifier::from_bytes(public)?),
        })
    }

    pub fn suite(&self) -> AlgSuite {
        match self {
            SuiteVerifier::Classic(_) => AlgSuite::Classic,
            SuiteVerifier::Fips(_) => AlgSuite::Fips,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            SuiteVerifier::Classic(v) => v.to_bytes(),
            SuiteVerifier::Fips(v) => v.to_bytes(),
        }
    }
}

impl TokenVerifier for SuiteVerifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            SuiteVerifier::Classic(v) => v.verify(message, signature),
            SuiteVerifier::Fips(v) => v.verify(message, signature),
        }
    }
}
