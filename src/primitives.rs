use chrono::{DateTime, SubsecRound, Utc};
use std::fmt;

use crate::rights::Rights;
use crate::types::{Nonce, ObjectId, SubjectId, TOKEN_DELIMITER};

// --- Claims -----------------------------------------------------------------

/// The unsigned content of a capability token.
///
/// Fields are private: once a `Claims` value has been signed it is never
/// mutated, and any change to its encoding breaks the signature anyway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claims {
    subject_id: SubjectId,
    object_id: ObjectId,
    rights: Rights,
    expiry: DateTime<Utc>,
    nonce: Nonce,
}

impl Claims {
    /// Assembles claims. `expiry` is truncated to whole seconds, the precision
    /// of the canonical encoding.
    pub fn new(
        subject_id: SubjectId,
        object_id: ObjectId,
        rights: Rights,
        expiry: DateTime<Utc>,
        nonce: Nonce,
    ) -> Self {
        Claims {
            subject_id,
            object_id,
            rights,
            expiry: expiry.trunc_subsecs(0),
            nonce,
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn rights(&self) -> &Rights {
        &self.rights
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// A token is expired strictly after its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry
    }
}

// --- Token ------------------------------------------------------------------

/// Encoded capability token: `<claims>::<hex signature>`.
///
/// Bearer credential. Whoever holds these exact bytes can present them.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Joins a claims encoding and raw signature bytes into the wire form.
    pub(crate) fn assemble(claims_encoding: &str, signature: &[u8]) -> Self {
        let mut s = String::with_capacity(claims_encoding.len() + TOKEN_DELIMITER.len() + signature.len() * 2);
        s.push_str(claims_encoding);
        s.push_str(TOKEN_DELIMITER);
        s.push_str(&hex::encode(signature));
        Token(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token(value.to_owned())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Tokens are credentials; keep them out of debug logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({} bytes)", self.0.len())
    }
}

/// A freshly issued token together with the claims it was signed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub claims: Claims,
    pub token: Token,
}

// --- Grant ------------------------------------------------------------------

/// Successful verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub subject_id: SubjectId,
    pub object_id: ObjectId,
    pub rights: Rights,
    pub expiry: DateTime<Utc>,
}

impl From<Claims> for Grant {
    fn from(claims: Claims) -> Self {
        Grant {
            subject_id: claims.subject_id,
            object_id: claims.object_id,
            rights: claims.rights,
            expiry: claims.expiry,
        }
    }
}

// --- Issued-token record ----------------------------------------------------

/// Audit record kept by the token store for every issued token.
/// Not consulted during verification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssuedTokenRecord {
    pub subject_id: SubjectId,
    pub object_id: ObjectId,
    pub rights: Rights,
    pub expiry: DateTime<Utc>,
    pub nonce: Nonce,
    pub token: Token,
    pub revoked: bool,
}

impl From<&SignedToken> for IssuedTokenRecord {
    fn from(signed: &SignedToken) -> Self {
        IssuedTokenRecord {
            subject_id: signed.claims.subject_id,
            object_id: signed.claims.object_id,
            rights: signed.claims.rights.clone(),
            expiry: signed.claims.expiry,
            nonce: signed.claims.nonce.clone(),
            token: signed.token.clone(),
            revoked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_claims(expiry: DateTime<Utc>) -> Claims {
        Claims::new(
            SubjectId(1),
            ObjectId(2),
            Rights::new(["read"]).unwrap(),
            expiry,
            Nonce::from_string("00".into()).unwrap(),
        )
    }

    #[test]
    fn test_claims_truncate_subsecond_expiry() {
        let expiry = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::milliseconds(750);
        let claims = sample_claims(expiry);
        assert_eq!(claims.expiry(), Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expiry = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = sample_claims(expiry);
        assert!(!claims.is_expired_at(expiry), "Token should still be valid at its expiry instant");
        assert!(claims.is_expired_at(expiry + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_token_assemble_uses_lowercase_hex() {
        let token = Token::assemble("{}", &[0xAB, 0x01]);
        assert_eq!(token.as_str(), "{}::ab01");
    }

    #[test]
    fn test_token_debug_hides_contents() {
        let token = Token::from("secret::00");
        assert_eq!(format!("{:?}", token), "Token(10 bytes)");
    }

    #[test]
    fn test_record_from_signed_token_starts_unrevoked() {
        let claims = sample_claims(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let signed = SignedToken { claims: claims.clone(), token: Token::from("x::00") };
        let record = IssuedTokenRecord::from(&signed);
        assert!(!record.revoked);
        assert_eq!(record.subject_id, claims.subject_id());
        assert_eq!(record.token, signed.token);
    }
}
