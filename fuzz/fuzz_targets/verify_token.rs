#![no_main]

// Random tokens against a fixed key: the verifier must never panic and must
// never grant a token it did not see signed.

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use captoken_core::crypto::SuiteSigner;
use captoken_core::error::{Denial, StoreError};
use captoken_core::revocation::RevocationDigest;
use captoken_core::types::AlgSuite;
use captoken_core::verifier::Verifier;

#[derive(Arbitrary, Debug)]
struct Input {
    token: Vec<u8>,
    right: String,
    secs: u32,
}

fuzz_target!(|input: Input| {
    let verifier = Verifier::new(SuiteSigner::from_bytes(AlgSuite::Classic, &[7u8; 32]).unwrap().verifier());
    let now = Utc.timestamp_opt(1_700_000_000 + i64::from(input.secs), 0).unwrap();
    let lookup = |_: &RevocationDigest| -> Result<bool, StoreError> { Ok(false) };

    match verifier.verify_bytes(&input.token, &input.right, now, &lookup) {
        Ok(grant) => panic!("forged grant: {:?}", grant),
        Err(Denial::RevocationUnavailable(_)) => unreachable!(),
        Err(_) => {}
    }
});
