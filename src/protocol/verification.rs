use crate::crypto::TokenVerifier;
use crate::error::Denial;
use crate::primitives::Grant;
use crate::revocation::{RevocationRegistry, RevocationStore};
use crate::time::Clock;
use crate::verifier::Verifier;

/// Checks presented tokens. Read-only: never writes and never calls the issuer.
pub struct VerificationProtocol<V, R, C>
where
    V: TokenVerifier,
    R: RevocationStore,
    C: Clock,
{
    verifier: Verifier<V>,
    revocations: RevocationRegistry<R>,
    clock: C,
}

impl<V, R, C> VerificationProtocol<V, R, C>
where
    V: TokenVerifier,
    R: RevocationStore,
    C: Clock,
{
    pub fn new(verifier: Verifier<V>, revocations: RevocationRegistry<R>, clock: C) -> Self {
        VerificationProtocol { verifier, revocations, clock }
    }

    /// Verifies `token` for `right` at the clock's current time.
    pub fn verify(&self, token: &str, right: &str) -> Result<Grant, Denial> {
        let result = self.verifier.verify(token, right, self.clock.now(), &self.revocations);
        if let Ok(grant) = &result {
            tracing::debug!(
                subject_id = %grant.subject_id,
                object_id = %grant.object_id,
                right,
                "access granted"
            );
        }
        result
    }
}
