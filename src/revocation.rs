//!
//! Revocation registry.
//!
//! Revocation is keyed by the SHA-256 digest of the exact token string. A
//! token that was re-encoded or re-signed, even with identical claims, is a
//! different entry: holders of those bytes are unaffected. Entries are never
//! removed.

use std::collections::HashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::crypto::sha256_hex;
use crate::error::StoreError;

/// Lowercase hex SHA-256 of a full encoded token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevocationDigest(String);

impl RevocationDigest {
    pub fn of(token: &[u8]) -> Self {
        RevocationDigest(sha256_hex(token))
    }

    /// Parses a stored digest: exactly 64 lowercase hex characters.
    pub fn from_hex(value: &str) -> Result<Self, StoreError> {
        let valid = value.len() == 64
            && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(RevocationDigest(value.to_owned()))
        } else {
            Err(StoreError::Corrupt(format!("invalid revocation digest {:?}", value)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevocationDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acknowledgement of a revocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub digest: RevocationDigest,
    /// False when the token had already been revoked.
    pub newly_revoked: bool,
}

/// Durable set of revocation digests.
///
/// Implementations must make an `insert` visible to every later `exists`
/// call on the same store.
pub trait RevocationStore: Send + Sync {
    /// Inserts `digest`. Returns `false` if it was already present.
    fn insert(&self, digest: &RevocationDigest) -> Result<bool, StoreError>;
    fn exists(&self, digest: &RevocationDigest) -> Result<bool, StoreError>;
}

impl<T: RevocationStore + ?Sized> RevocationStore for Arc<T> {
    fn insert(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        (**self).insert(digest)
    }

    fn exists(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        (**self).exists(digest)
    }
}

/// Lookup consulted by the verifier.
pub trait RevocationLookup {
    fn is_revoked(&self, digest: &RevocationDigest) -> Result<bool, StoreError>;
}

impl<F> RevocationLookup for F
where
    F: Fn(&RevocationDigest) -> Result<bool, StoreError>,
{
    fn is_revoked(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        self(digest)
    }
}

// --- In-memory store --------------------------------------------------------

/// Process-local store. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    digests: RwLock<HashSet<RevocationDigest>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.digests.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn insert(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        let mut digests = self.digests.write().map_err(|_| StoreError::Poisoned)?;
        Ok(digests.insert(digest.clone()))
    }

    fn exists(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        let digests = self.digests.read().map_err(|_| StoreError::Poisoned)?;
        Ok(digests.contains(digest))
    }
}

// --- File-backed store ------------------------------------------------------

/// Append-only log of digests, one per line.
///
/// Inserts are appended and flushed to disk before they are acknowledged and
/// are immediately visible through the same handle. Another process sharing
/// the file only sees entries written before it opened the file or last
/// called [`FileRevocationStore::reload`]; deployments with separate verifier
/// processes must reload on a schedule and accept that staleness window.
#[derive(Debug)]
pub struct FileRevocationStore {
    path: PathBuf,
    digests: RwLock<HashSet<RevocationDigest>>,
    log: Mutex<File>,
}

impl FileRevocationStore {
    /// Opens (creating if needed) the log at `path` and loads its entries.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let log = OpenOptions::new().create(true).append(true).open(&path)?;
        let digests = Self::load(&path)?;
        tracing::debug!(path = %path.display(), entries = digests.len(), "opened revocation log");
        Ok(FileRevocationStore {
            path,
            digests: RwLock::new(digests),
            log: Mutex::new(log),
        })
    }

    fn load(path: &Path) -> Result<HashSet<RevocationDigest>, StoreError> {
        let reader = BufReader::new(File::open(path)?);
        let mut digests = HashSet::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let digest = RevocationDigest::from_hex(line).map_err(|_| {
                StoreError::Corrupt(format!("{}:{}: invalid digest", path.display(), lineno + 1))
            })?;
            digests.insert(digest);
        }
        Ok(digests)
    }

    /// Re-reads the log, picking up entries appended by other processes.
    pub fn reload(&self) -> Result<(), StoreError> {
        let fresh = Self::load(&self.path)?;
        let mut digests = self.digests.write().map_err(|_| StoreError::Poisoned)?;
        digests.extend(fresh);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RevocationStore for FileRevocationStore {
    fn insert(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        let mut digests = self.digests.write().map_err(|_| StoreError::Poisoned)?;
        if digests.contains(digest) {
            return Ok(false);
        }
        {
            let mut log = self.log.lock().map_err(|_| StoreError::Poisoned)?;
            writeln!(log, "{}", digest)?;
            log.flush()?;
            log.sync_data()?;
        }
        digests.insert(digest.clone());
        Ok(true)
    }

    fn exists(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        let digests = self.digests.read().map_err(|_| StoreError::Poisoned)?;
        Ok(digests.contains(digest))
    }
}

// --- Registry ---------------------------------------------------------------

/// Append-only record of revoked tokens over a [`RevocationStore`].
#[derive(Debug, Clone)]
pub struct RevocationRegistry<S: RevocationStore> {
    store: S,
}

impl<S: RevocationStore> RevocationRegistry<S> {
    pub fn new(store: S) -> Self {
        RevocationRegistry { store }
    }

    /// Revokes the exact token bytes. Revoking twice is not an error.
    pub fn revoke(&self, token: &[u8]) -> Result<Ack, StoreError> {
        let digest = RevocationDigest::of(token);
        let newly_revoked = self.store.insert(&digest)?;
        if newly_revoked {
            tracing::info!(%digest, "token revoked");
        } else {
            tracing::debug!(%digest, "token already revoked");
        }
        Ok(Ack { digest, newly_revoked })
    }

    pub fn contains(&self, token: &[u8]) -> Result<bool, StoreError> {
        self.store.exists(&RevocationDigest::of(token))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RevocationStore> RevocationLookup for RevocationRegistry<S> {
    fn is_revoked(&self, digest: &RevocationDigest) -> Result<bool, StoreError> {
        self.store.exists(digest)
    }
}
