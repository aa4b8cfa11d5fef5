//!
//! Token verifier. Holds public key material only.
//!
//! Checks run in a fixed order and the first failing check decides the
//! denial a caller observes:
//!
//! 1. exactly one `::` delimiter            -> `MalformedToken`
//! 2. signature half is lowercase hex       -> `MalformedToken`
//! 3. signature over the claims half        -> `SignatureInvalid`
//! 4. claims decode                         -> `MalformedToken`
//! 5. `now > expiry`                        -> `Expired`
//! 6. digest of the full token not revoked  -> `Revoked`
//! 7. requested right is granted            -> `InsufficientRights`
//!
//! Nothing in the claims is parsed or branched on before step 3 succeeds.

use chrono::{DateTime, Utc};

use crate::crypto::TokenVerifier;
use crate::encoding;
use crate::error::Denial;
use crate::primitives::Grant;
use crate::revocation::{RevocationDigest, RevocationLookup};
use crate::rights;
use crate::types::TOKEN_DELIMITER;

/// Verifies capability tokens against a public key.
#[derive(Debug, Clone)]
pub struct Verifier<V: TokenVerifier> {
    key: V,
}

impl<V: TokenVerifier> Verifier<V> {
    pub fn new(key: V) -> Self {
        Verifier { key }
    }

    /// Verifies `token` for `requested_right` at `now`.
    ///
    /// A pure function of the public key, the token, the revocation lookup,
    /// the time and the requested right.
    pub fn verify<L>(
        &self,
        token: &str,
        requested_right: &str,
        now: DateTime<Utc>,
        revocation: &L,
    ) -> Result<Grant, Denial>
    where
        L: RevocationLookup + ?Sized,
    {
        // 1. Structure.
        let (claims_part, sig_hex) = match token.split_once(TOKEN_DELIMITER) {
            Some((claims, sig)) if !sig.contains(TOKEN_DELIMITER) => (claims, sig),
            _ => {
                tracing::debug!("token rejected: delimiter missing or repeated");
                return Err(Denial::MalformedToken);
            }
        };

        // 2. Transport encoding of the signature. Only the lowercase form is
        // accepted: any other spelling would hash to a different revocation
        // digest.
        if !sig_hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            tracing::debug!("token rejected: signature is not lowercase hex");
            return Err(Denial::MalformedToken);
        }
        let signature = hex::decode(sig_hex).map_err(|_| {
            tracing::debug!("token rejected: signature is not hex");
            Denial::MalformedToken
        })?;

        // 3. Authenticity.
        if self.key.verify(claims_part.as_bytes(), &signature).is_err() {
            tracing::warn!("token rejected: invalid signature");
            return Err(Denial::SignatureInvalid);
        }

        // 4. Claims, now authenticated.
        let claims = encoding::decode(claims_part.as_bytes()).map_err(|e| {
            tracing::error!(error = %e, "signed claims failed to decode; issuer and verifier encodings disagree");
            Denial::MalformedToken
        })?;

        // 5. Expiry.
        if claims.is_expired_at(now) {
            tracing::debug!(subject_id = %claims.subject_id(), expiry = %claims.expiry(), "token rejected: expired");
            return Err(Denial::Expired);
        }

        // 6. Revocation, keyed on the full presented token.
        let digest = RevocationDigest::of(token.as_bytes());
        match revocation.is_revoked(&digest) {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(%digest, "token rejected: revoked");
                return Err(Denial::Revoked);
            }
            Err(e) => {
                tracing::error!(error = %e, "revocation lookup failed; denying");
                return Err(Denial::RevocationUnavailable(e));
            }
        }

        // 7. Rights.
        if !rights::sufficient(claims.rights(), requested_right) {
            tracing::debug!(
                subject_id = %claims.subject_id(),
                requested_right,
                "token rejected: right not granted"
            );
            return Err(Denial::InsufficientRights);
        }

        Ok(Grant::from(claims))
    }

    /// Byte-level entry point. Tokens that are not UTF-8 are malformed.
    pub fn verify_bytes<L>(
        &self,
        token: &[u8],
        requested_right: &str,
        now: DateTime<Utc>,
        revocation: &L,
    ) -> Result<Grant, Denial>
    where
        L: RevocationLookup + ?Sized,
    {
        let token = std::str::from_utf8(token).map_err(|_| Denial::MalformedToken)?;
        self.verify(token, requested_right, now, revocation)
    }
}
