#![no_main]

// Anything the decoder accepts must re-encode to bytes that decode to the
// same claims.

use libfuzzer_sys::fuzz_target;
use captoken_core::encoding::{decode, encode};

fuzz_target!(|data: &[u8]| {
    if let Ok(claims) = decode(data) {
        let bytes = encode(&claims).expect("decoded claims must encode");
        assert_eq!(decode(&bytes).expect("canonical bytes must decode"), claims);
    }
});
