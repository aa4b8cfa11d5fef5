//!
//! Canonical claims encoding.
//!
//! Claims are serialized as a JSON object with exactly five members in a fixed
//! order, using `", "` between members and `": "` between key and value:
//!
//! ```text
//! {"subject_id": 1, "object_id": 2, "rights": "read,write", "expiry": "2024-01-01 12:30:00", "nonce": "9f..."}
//! ```
//!
//! The rights set is sorted before joining, so the encoding of a logical
//! claims value never varies. None of the members can contain `::`, which
//! keeps the token delimiter unambiguous.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;

use crate::error::{DecodeError, EncodeError};
use crate::primitives::Claims;
use crate::rights::Rights;
use crate::types::{Nonce, ObjectId, SubjectId, EXPIRY_FORMAT};

/// Wire view of the claims, borrowed for encoding. Field order is the
/// encoding order.
#[derive(Serialize)]
struct WireClaims<'a> {
    subject_id: u64,
    object_id: u64,
    rights: String,
    expiry: String,
    nonce: &'a str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OwnedWireClaims {
    subject_id: u64,
    object_id: u64,
    rights: String,
    expiry: String,
    nonce: String,
}

/// JSON formatter emitting the spaced separators of the canonical form.
#[derive(Debug, Default, Clone, Copy)]
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encodes claims into their canonical byte form.
pub fn encode(claims: &Claims) -> Result<Vec<u8>, EncodeError> {
    let wire = WireClaims {
        subject_id: claims.subject_id().0,
        object_id: claims.object_id().0,
        rights: claims.rights().to_canonical_string(),
        expiry: claims.expiry().format(EXPIRY_FORMAT).to_string(),
        nonce: claims.nonce().as_str(),
    };
    let mut buf = Vec::with_capacity(192);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
    wire.serialize(&mut ser)
        .map_err(|e| EncodeError(e.to_string()))?;
    Ok(buf)
}

/// Same as [`encode`], as a `String`. The encoding is always valid UTF-8.
pub fn encode_string(claims: &Claims) -> Result<String, EncodeError> {
    String::from_utf8(encode(claims)?).map_err(|e| EncodeError(e.to_string()))
}

/// Decodes canonical claims bytes.
///
/// Any structural problem is reported as a single [`DecodeError`].
pub fn decode(bytes: &[u8]) -> Result<Claims, DecodeError> {
    let wire: OwnedWireClaims =
        serde_json::from_slice(bytes).map_err(|e| DecodeError(e.to_string()))?;

    let rights = Rights::parse(&wire.rights).map_err(|e| DecodeError(e.to_string()))?;
    let expiry = NaiveDateTime::parse_from_str(&wire.expiry, EXPIRY_FORMAT)
        .map_err(|e| DecodeError(format!("expiry {:?}: {}", wire.expiry, e)))?
        .and_utc();
    let nonce = Nonce::from_string(wire.nonce).ok_or_else(|| DecodeError("nonce must be non-empty lowercase hex".into()))?;

    Ok(Claims::new(
        SubjectId(wire.subject_id),
        ObjectId(wire.object_id),
        rights,
        expiry,
        nonce,
    ))
}
