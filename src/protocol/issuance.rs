use crate::authority::SigningAuthority;
use crate::crypto::TokenSigner;
use crate::error::IssueError;
use crate::primitives::{IssuedTokenRecord, Token};
use crate::registry::{IdentityRegistry, ObjectRegistry, TokenStore};
use crate::rights::Rights;
use crate::time::Clock;
use crate::types::{ObjectId, SubjectId};

/// How lookup failures are reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Report `SubjectNotFound` or `ObjectNotFound`.
    #[default]
    Distinct,
    /// Report a bare `NotFound`, so callers cannot probe which names exist.
    Opaque,
}

/// Issues tokens on behalf of named subjects for named objects.
pub struct IssuanceProtocol<S, I, O, T, C>
where
    S: TokenSigner,
    I: IdentityRegistry,
    O: ObjectRegistry,
    T: TokenStore,
    C: Clock,
{
    authority: SigningAuthority<S>,
    identities: I,
    objects: O,
    tokens: T,
    clock: C,
    not_found: NotFoundPolicy,
}

impl<S, I, O, T, C> IssuanceProtocol<S, I, O, T, C>
where
    S: TokenSigner,
    I: IdentityRegistry,
    O: ObjectRegistry,
    T: TokenStore,
    C: Clock,
{
    pub fn new(authority: SigningAuthority<S>, identities: I, objects: O, tokens: T, clock: C) -> Self {
        IssuanceProtocol {
            authority,
            identities,
            objects,
            tokens,
            clock,
            not_found: NotFoundPolicy::default(),
        }
    }

    pub fn with_not_found_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found = policy;
        self
    }

    fn lookup(&self, username: &str, object: &str) -> Result<(SubjectId, ObjectId), IssueError> {
        let subject_id = self.identities.resolve_subject(username)?;
        let object_id = self.objects.resolve_object(object)?;
        match (subject_id, object_id, self.not_found) {
            (Some(s), Some(o), _) => Ok((s, o)),
            (None, _, NotFoundPolicy::Distinct) => Err(IssueError::SubjectNotFound(username.to_owned())),
            (_, None, NotFoundPolicy::Distinct) => Err(IssueError::ObjectNotFound(object.to_owned())),
            (s, o, NotFoundPolicy::Opaque) => {
                tracing::debug!(
                    subject_found = s.is_some(),
                    object_found = o.is_some(),
                    "issuance lookup failed"
                );
                Err(IssueError::NotFound)
            }
        }
    }

    /// Issues a token granting `rights` over `object` to `username`, records
    /// it in the token store and returns the encoded token.
    ///
    /// Rights are validated before any lookup.
    pub fn issue<R>(&self, username: &str, object: &str, rights: R) -> Result<Token, IssueError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let rights = Rights::new(rights)?;
        let (subject_id, object_id) = self.lookup(username, object)?;

        let signed = self.authority.issue(subject_id, object_id, rights, self.clock.now())?;
        self.tokens.save(IssuedTokenRecord::from(&signed)).map_err(|e| {
            tracing::error!(%subject_id, %object_id, error = %e, "failed to record issued token");
            e
        })?;
        Ok(signed.token)
    }

    /// Audit listing of every token issued to `username`.
    pub fn list_issued(&self, username: &str) -> Result<Vec<IssuedTokenRecord>, IssueError> {
        let subject_id = match self.identities.resolve_subject(username)? {
            Some(id) => id,
            None if self.not_found == NotFoundPolicy::Opaque => return Err(IssueError::NotFound),
            None => return Err(IssueError::SubjectNotFound(username.to_owned())),
        };
        Ok(self.tokens.list_by_subject(subject_id)?)
    }
}
