#![cfg(test)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::authority::SigningAuthority;
use crate::crypto::{SuiteSigner, SuiteVerifier};
use crate::error::{Denial, IssueError, StoreError};
use crate::primitives::Token;
use crate::protocol::{IssuanceProtocol, NotFoundPolicy, RevocationProtocol, VerificationProtocol};
use crate::registry::{IdentityRegistry, MemoryDirectory, MemoryTokenStore, TokenStore};
use crate::revocation::{MemoryRevocationStore, RevocationRegistry};
use crate::time::ManualClock;
use crate::types::{AlgSuite, ObjectId, SubjectId};
use crate::verifier::Verifier;

// --- Test Utilities ---

type Issuer = IssuanceProtocol<
    SuiteSigner,
    Arc<MemoryDirectory>,
    Arc<MemoryDirectory>,
    Arc<MemoryTokenStore>,
    Arc<ManualClock>,
>;
type Checker = VerificationProtocol<SuiteVerifier, Arc<MemoryRevocationStore>, Arc<ManualClock>>;
type Revoker = RevocationProtocol<Arc<MemoryRevocationStore>, Arc<MemoryTokenStore>>;

struct Harness {
    directory: Arc<MemoryDirectory>,
    tokens: Arc<MemoryTokenStore>,
    clock: Arc<ManualClock>,
    issuer: Issuer,
    checker: Checker,
    revoker: Revoker,
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()
}

fn create_harness(suite: AlgSuite, policy: NotFoundPolicy) -> Harness {
    let directory = Arc::new(MemoryDirectory::new());
    let tokens = Arc::new(MemoryTokenStore::new());
    let revocations = Arc::new(MemoryRevocationStore::new());
    let clock = Arc::new(ManualClock::new(start_time()));

    directory.register_subject("alice").unwrap();
    directory.register_subject("bob").unwrap();
    directory.register_object("file1").unwrap();

    let signer = SuiteSigner::generate(suite);
    // The verifying side only ever sees the public half.
    let public = signer.verifier();

    let issuer = IssuanceProtocol::new(
        SigningAuthority::new(signer),
        Arc::clone(&directory),
        Arc::clone(&directory),
        Arc::clone(&tokens),
        Arc::clone(&clock),
    )
    .with_not_found_policy(policy);
    let checker = VerificationProtocol::new(
        Verifier::new(public),
        RevocationRegistry::new(Arc::clone(&revocations)),
        Arc::clone(&clock),
    );
    let revoker = RevocationProtocol::new(RevocationRegistry::new(revocations), Arc::clone(&tokens));

    Harness { directory, tokens, clock, issuer, checker, revoker }
}

fn harness() -> Harness {
    create_harness(AlgSuite::Classic, NotFoundPolicy::Distinct)
}

// --- Test Cases ---

#[test]
fn test_end_to_end_issue_revoke_reissue() {
    let h = harness();

    let token = h.issuer.issue("alice", "file1", ["read", "write"]).expect("issue failed");
    let grant = h.checker.verify(token.as_str(), "read").expect("fresh token should grant");
    assert_eq!(grant.subject_id, SubjectId(1));
    assert_eq!(grant.object_id, ObjectId(1));

    h.clock.advance(Duration::minutes(29));
    assert!(h.checker.verify(token.as_str(), "read").is_ok(), "Token should be valid before 30 minutes");

    let ack = h.revoker.revoke(&token).expect("revoke failed");
    assert!(ack.newly_revoked);
    assert_eq!(h.checker.verify(token.as_str(), "read"), Err(Denial::Revoked));

    let fresh = h.issuer.issue("alice", "file1", ["read", "write"]).expect("reissue failed");
    assert_ne!(fresh, token);
    assert!(h.checker.verify(fresh.as_str(), "read").is_ok(), "Reissued token should grant");
}

#[test]
fn test_for_all_suites_issued_tokens_verify() {
    for suite in [AlgSuite::Classic, AlgSuite::Fips] {
        let h = create_harness(suite, NotFoundPolicy::Distinct);
        let token = h.issuer.issue("bob", "file1", ["write"]).unwrap();
        assert!(h.checker.verify(token.as_str(), "write").is_ok(), "{} token should verify", suite);
    }
}

#[test]
fn test_expiry_after_thirty_minutes() {
    let h = harness();
    let token = h.issuer.issue("alice", "file1", ["read"]).unwrap();
    h.clock.advance(Duration::minutes(30));
    assert!(h.checker.verify(token.as_str(), "read").is_ok(), "Valid at the expiry instant");
    h.clock.advance(Duration::seconds(1));
    assert_eq!(h.checker.verify(token.as_str(), "read"), Err(Denial::Expired));
}

#[test]
fn test_expired_and_revoked_reports_expired() {
    let h = harness();
    let token = h.issuer.issue("alice", "file1", ["read"]).unwrap();
    h.revoker.revoke(&token).unwrap();
    h.clock.advance(Duration::hours(2));
    assert_eq!(h.checker.verify(token.as_str(), "read"), Err(Denial::Expired));
}

#[test]
fn test_insufficient_rights() {
    let h = harness();
    let token = h.issuer.issue("alice", "file1", ["read"]).unwrap();
    assert_eq!(h.checker.verify(token.as_str(), "write"), Err(Denial::InsufficientRights));
}

#[test]
fn test_identical_issuances_revoke_independently() {
    let h = harness();
    let a = h.issuer.issue("alice", "file1", ["read"]).unwrap();
    let b = h.issuer.issue("alice", "file1", ["read"]).unwrap();
    assert_ne!(a, b, "Same inputs at the same instant must still produce distinct tokens");

    h.revoker.revoke(&a).unwrap();
    assert_eq!(h.checker.verify(a.as_str(), "read"), Err(Denial::Revoked));
    assert!(h.checker.verify(b.as_str(), "read").is_ok());
}

#[test]
fn test_revoke_is_idempotent_and_flags_record() {
    let h = harness();
    let token = h.issuer.issue("alice", "file1", ["read"]).unwrap();

    assert!(h.revoker.revoke(&token).unwrap().newly_revoked);
    assert!(!h.revoker.revoke(&token).unwrap().newly_revoked);

    let records = h.issuer.list_issued("alice").unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].revoked);
}

#[test]
fn test_revoke_unknown_token_still_recorded() {
    let h = harness();
    let stray = Token::from("never-issued::00");
    let ack = h.revoker.revoke(&stray).unwrap();
    assert!(ack.newly_revoked);
    assert!(h.tokens.is_empty().unwrap());
}

#[test]
fn test_issuance_persists_record() {
    let h = harness();
    let token = h.issuer.issue("bob", "file1", ["write", "read", "write"]).unwrap();
    let records = h.tokens.list_by_subject(SubjectId(2)).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.token, token);
    assert_eq!(record.object_id, ObjectId(1));
    assert_eq!(record.rights.to_canonical_string(), "read,write");
    assert_eq!(record.expiry, start_time() + Duration::minutes(30));
    assert!(!record.revoked);
}

#[test]
fn test_distinct_not_found() {
    let h = harness();
    assert_eq!(
        h.issuer.issue("mallory", "file1", ["read"]),
        Err(IssueError::SubjectNotFound("mallory".into()))
    );
    assert_eq!(
        h.issuer.issue("alice", "file9", ["read"]),
        Err(IssueError::ObjectNotFound("file9".into()))
    );
    assert!(h.tokens.is_empty().unwrap(), "Failed issuance must not persist anything");
}

#[test]
fn test_opaque_not_found() {
    let h = create_harness(AlgSuite::Classic, NotFoundPolicy::Opaque);
    for (user, object) in [("mallory", "file1"), ("alice", "file9"), ("mallory", "file9")] {
        let err = h.issuer.issue(user, object, ["read"]).unwrap_err();
        assert_eq!(err, IssueError::NotFound);
        assert!(err.is_not_found());
    }
    assert_eq!(h.issuer.list_issued("mallory"), Err(IssueError::NotFound));
}

#[test]
fn test_invalid_rights_rejected_before_lookup() {
    let h = harness();
    assert!(matches!(
        h.issuer.issue("mallory", "file1", Vec::<String>::new()),
        Err(IssueError::InvalidRights(_))
    ));
    assert!(matches!(
        h.issuer.issue("alice", "file1", ["read::write"]),
        Err(IssueError::InvalidRights(_))
    ));
}

#[test]
fn test_registration_after_start_is_visible() {
    let h = harness();
    h.directory.register_subject("carol").unwrap();
    assert_eq!(h.directory.resolve_subject("carol").unwrap(), Some(SubjectId(3)));
    assert!(h.issuer.issue("carol", "file1", ["read"]).is_ok());
}

// Token store that refuses writes, to check storage errors surface.
#[derive(Debug)]
struct BrokenTokenStore;

impl TokenStore for BrokenTokenStore {
    fn save(&self, _record: crate::primitives::IssuedTokenRecord) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".into()))
    }

    fn list_by_subject(&self, _subject_id: SubjectId) -> Result<Vec<crate::primitives::IssuedTokenRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn mark_revoked(&self, _token: &Token) -> Result<bool, StoreError> {
        Err(StoreError::Io("disk full".into()))
    }
}

#[test]
fn test_storage_failure_surfaces_on_issue() {
    let directory = Arc::new(MemoryDirectory::new());
    directory.register_subject("alice").unwrap();
    directory.register_object("file1").unwrap();
    let issuer = IssuanceProtocol::new(
        SigningAuthority::new(SuiteSigner::generate(AlgSuite::Classic)),
        Arc::clone(&directory),
        directory,
        BrokenTokenStore,
        ManualClock::new(start_time()),
    );
    assert_eq!(
        issuer.issue("alice", "file1", ["read"]),
        Err(IssueError::Storage(StoreError::Io("disk full".into())))
    );
}

#[test]
fn test_revoke_surfaces_audit_store_failure_after_recording() {
    let revocations = Arc::new(MemoryRevocationStore::new());
    let revoker = RevocationProtocol::new(RevocationRegistry::new(Arc::clone(&revocations)), BrokenTokenStore);
    let token = Token::from("x::00");
    assert!(revoker.revoke(&token).is_err());
    // The revocation itself is durable even though the audit update failed.
    assert_eq!(revocations.len().unwrap(), 1);
}

#[test]
fn test_concurrent_issue_and_verify() {
    let h = Arc::new(harness());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let h = Arc::clone(&h);
            std::thread::spawn(move || {
                let token = h.issuer.issue("alice", "file1", ["read"]).unwrap();
                h.checker.verify(token.as_str(), "read").unwrap();
                token
            })
        })
        .collect();
    let tokens: std::collections::HashSet<Token> =
        handles.into_iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(tokens.len(), 8);
    assert_eq!(h.tokens.len().unwrap(), 8);
}
