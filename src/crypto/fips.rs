//!
//! FIPS algorithm suite: ECDSA over P-256 with SHA-256.
//!
//! Only low-S signatures verify. `(r, s)` and `(r, n - s)` are both valid
//! ECDSA signatures over the same message; accepting both would give every
//! token a second spelling with its own revocation digest.

use p256::ecdsa::{
    signature::{Signer as EcdsaSigner, Verifier as EcdsaVerifier},
    Signature as EcdsaP256Signature,
    SigningKey as EcdsaP256SigningKey,
    VerifyingKey as EcdsaP256VerifyingKey,
};
use rand_core::OsRng;

use super::{TokenSigner, TokenVerifier};
use crate::error::CryptoError;

/// P-256 private key handle.
#[derive(Clone)]
pub struct P256Signer {
    key: EcdsaP256SigningKey,
}

impl P256Signer {
    pub fn generate() -> Self {
        P256Signer { key: EcdsaP256SigningKey::random(&mut OsRng) }
    }

    /// Restores a key from its 32-byte big-endian scalar.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        let key = EcdsaP256SigningKey::from_slice(secret)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid P-256 private key: {}", e)))?;
        Ok(P256Signer { key })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.key.to_bytes().to_vec()
    }

    pub fn verifier(&self) -> P256Verifier {
        P256Verifier { key: EcdsaP256VerifyingKey::from(&self.key) }
    }
}

impl TokenSigner for P256Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature: EcdsaP256Signature = EcdsaSigner::try_sign(&self.key, message)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

/// P-256 public key handle (SEC1 encoded on the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct P256Verifier {
    key: EcdsaP256VerifyingKey,
}

impl P256Verifier {
    pub fn from_bytes(public: &[u8]) -> Result<Self, CryptoError> {
        let key = EcdsaP256VerifyingKey::from_sec1_bytes(public)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid P-256 public key: {}", e)))?;
        Ok(P256Verifier { key })
    }

    /// Uncompressed SEC1 encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.key.to_encoded_point(false).as_bytes().to_vec()
    }
}

impl TokenVerifier for P256Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let signature =
            EcdsaP256Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
        // Signing always normalizes to low-S.
        if signature.normalize_s().is_some() {
            return Err(CryptoError::InvalidSignature);
        }
        EcdsaVerifier::verify(&self.key, message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}
