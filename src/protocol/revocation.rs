use crate::error::StoreError;
use crate::primitives::Token;
use crate::registry::TokenStore;
use crate::revocation::{Ack, RevocationRegistry, RevocationStore};

/// Revokes tokens and keeps the issued-token audit trail in step.
pub struct RevocationProtocol<R, T>
where
    R: RevocationStore,
    T: TokenStore,
{
    revocations: RevocationRegistry<R>,
    tokens: T,
}

impl<R, T> RevocationProtocol<R, T>
where
    R: RevocationStore,
    T: TokenStore,
{
    pub fn new(revocations: RevocationRegistry<R>, tokens: T) -> Self {
        RevocationProtocol { revocations, tokens }
    }

    /// Revokes the exact token bytes. Idempotent, irreversible.
    ///
    /// The revocation entry is written first; the audit flag follows. Tokens
    /// with no audit record (issued elsewhere, or garbage) are still revoked.
    pub fn revoke(&self, token: &Token) -> Result<Ack, StoreError> {
        let ack = self.revocations.revoke(token.as_bytes())?;
        if !self.tokens.mark_revoked(token)? {
            tracing::debug!(digest = %ack.digest, "revoked token has no issuance record");
        }
        Ok(ack)
    }
}
