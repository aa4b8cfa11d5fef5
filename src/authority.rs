//!
//! Signing authority: the only component holding private key material.

use chrono::{DateTime, SubsecRound, Utc};

use crate::crypto::TokenSigner;
use crate::encoding;
use crate::error::AuthorityError;
use crate::primitives::{Claims, SignedToken, Token};
use crate::rights::Rights;
use crate::types::{token_lifetime, Nonce, ObjectId, SubjectId};

/// Issues capability tokens.
///
/// The signer is injected at construction and never changes afterwards;
/// share the authority behind an `Arc` for concurrent issuance.
#[derive(Debug, Clone)]
pub struct SigningAuthority<S: TokenSigner> {
    signer: S,
}

impl<S: TokenSigner> SigningAuthority<S> {
    pub fn new(signer: S) -> Self {
        SigningAuthority { signer }
    }

    /// Issues a token for `subject_id` over `object_id`.
    ///
    /// The expiry is `now` (truncated to the second) plus the fixed token
    /// lifetime, and a fresh nonce is drawn for every call.
    ///
    /// # Errors
    /// `AuthorityError::Encoding` if the claims cannot be serialized,
    /// `AuthorityError::Signing` if the signing backend fails.
    pub fn issue(
        &self,
        subject_id: SubjectId,
        object_id: ObjectId,
        rights: Rights,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, AuthorityError> {
        let expiry = now.trunc_subsecs(0) + token_lifetime();
        let claims = Claims::new(subject_id, object_id, rights, expiry, Nonce::generate());

        let encoded = encoding::encode_string(&claims)?;
        let signature = self.signer.sign(encoded.as_bytes()).map_err(|e| {
            tracing::error!(%subject_id, %object_id, error = %e, "signing backend failure");
            AuthorityError::Signing(e)
        })?;
        let token = Token::assemble(&encoded, &signature);

        tracing::info!(
            %subject_id,
            %object_id,
            rights = %claims.rights(),
            expiry = %claims.expiry(),
            "issued capability token"
        );
        Ok(SignedToken { claims, token })
    }
}
