//!
//! CLASSIC algorithm suite: Ed25519 signatures.

use ed25519_dalek::{
    Signature as Ed25519Signature,
    Signer as _,
    SigningKey as Ed25519SecretKey,
    VerifyingKey as Ed25519PublicKey,
    PUBLIC_KEY_LENGTH,
    SECRET_KEY_LENGTH,
};
use rand_core::OsRng;

use super::{TokenSigner, TokenVerifier};
use crate::error::CryptoError;

/// Ed25519 private key handle.
#[derive(Clone)]
pub struct Ed25519Signer {
    key: Ed25519SecretKey,
}

impl Ed25519Signer {
    pub fn generate() -> Self {
        Ed25519Signer { key: Ed25519SecretKey::generate(&mut OsRng) }
    }

    /// Restores a key from its 32-byte seed.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        let seed: &[u8; SECRET_KEY_LENGTH] = secret.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Ed25519 secret key must be {} bytes, got {}",
                SECRET_KEY_LENGTH,
                secret.len()
            ))
        })?;
        Ok(Ed25519Signer { key: Ed25519SecretKey::from_bytes(seed) })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.key.to_bytes().to_vec()
    }

    pub fn verifier(&self) -> Ed25519Verifier {
        Ed25519Verifier { key: self.key.verifying_key() }
    }
}

impl TokenSigner for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature: Ed25519Signature = self
            .key
            .try_sign(message)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

/// Ed25519 public key handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Verifier {
    key: Ed25519PublicKey,
}

impl Ed25519Verifier {
    pub fn from_bytes(public: &[u8]) -> Result<Self, CryptoError> {
        let bytes: &[u8; PUBLIC_KEY_LENGTH] = public.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Ed25519 public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                public.len()
            ))
        })?;
        let key = Ed25519PublicKey::from_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid Ed25519 public key: {}", e)))?;
        Ok(Ed25519Verifier { key })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.key.to_bytes().to_vec()
    }
}

impl TokenVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let signature =
            Ed25519Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
        self.key
            .verify_strict(message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_sign_verify_roundtrip() {
        let signer = Ed25519Signer::generate();
        let data = b"message to sign";
        let signature = signer.sign(data).unwrap();
        assert_eq!(signature.len(), ed25519_dalek::SIGNATURE_LENGTH);
        assert!(signer.verifier().verify(data, &signature).is_ok());
    }

    #[test]
    fn test_classic_verify_tampered_data() {
        let signer = Ed25519Signer::generate();
        let signature = signer.sign(b"message to sign").unwrap();
        let result = signer.verifier().verify(b"tampered message", &signature);
        assert_eq!(result, Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_classic_verify_wrong_key() {
        let signer1 = Ed25519Signer::generate();
        let signer2 = Ed25519Signer::generate();
        let signature = signer1.sign(b"message to sign").unwrap();
        let result = signer2.verifier().verify(b"message to sign", &signature);
        assert_eq!(result, Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_classic_verify_wrong_length_signature() {
        let signer = Ed25519Signer::generate();
        let verifier = signer.verifier();
        assert_eq!(verifier.verify(b"m", &[]), Err(CryptoError::InvalidSignature));
        assert_eq!(verifier.verify(b"m", &[0u8; 63]), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_classic_key_length_checked() {
        assert!(matches!(Ed25519Signer::from_bytes(&[0u8; 31]), Err(CryptoError::InvalidKey(_))));
        assert!(matches!(Ed25519Verifier::from_bytes(&[0u8; 33]), Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_classic_public_key_roundtrip() {
        let verifier = Ed25519Signer::generate().verifier();
        let restored = Ed25519Verifier::from_bytes(&verifier.to_bytes()).unwrap();
        assert_eq!(restored, verifier);
    }
}
