//!
//! Collaborator contracts used by the issuance side, plus in-memory
//! implementations.
//!
//! The identity and object registries map names to stable identifiers; the
//! token store keeps an audit trail of issued tokens. None of these are
//! consulted when a token is verified.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::primitives::{IssuedTokenRecord, Token};
use crate::types::{ObjectId, SubjectId};

/// Maps a username to its subject identifier.
pub trait IdentityRegistry: Send + Sync {
    fn resolve_subject(&self, username: &str) -> Result<Option<SubjectId>, StoreError>;
}

/// Maps an object name to its object identifier.
pub trait ObjectRegistry: Send + Sync {
    fn resolve_object(&self, name: &str) -> Result<Option<ObjectId>, StoreError>;
}

/// Audit store of issued tokens.
pub trait TokenStore: Send + Sync {
    fn save(&self, record: IssuedTokenRecord) -> Result<(), StoreError>;
    fn list_by_subject(&self, subject_id: SubjectId) -> Result<Vec<IssuedTokenRecord>, StoreError>;
    /// Flags the record for `token` as revoked. Returns `false` when no record
    /// exists for it.
    fn mark_revoked(&self, token: &Token) -> Result<bool, StoreError>;
}

impl<T: IdentityRegistry + ?Sized> IdentityRegistry for Arc<T> {
    fn resolve_subject(&self, username: &str) -> Result<Option<SubjectId>, StoreError> {
        (**self).resolve_subject(username)
    }
}

impl<T: ObjectRegistry + ?Sized> ObjectRegistry for Arc<T> {
    fn resolve_object(&self, name: &str) -> Result<Option<ObjectId>, StoreError> {
        (**self).resolve_object(name)
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn save(&self, record: IssuedTokenRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn list_by_subject(&self, subject_id: SubjectId) -> Result<Vec<IssuedTokenRecord>, StoreError> {
        (**self).list_by_subject(subject_id)
    }

    fn mark_revoked(&self, token: &Token) -> Result<bool, StoreError> {
        (**self).mark_revoked(token)
    }
}

// --- In-memory directory ----------------------------------------------------

#[derive(Debug, Default)]
struct DirectoryState {
    subjects: HashMap<String, SubjectId>,
    objects: HashMap<String, ObjectId>,
    next_subject: u64,
    next_object: u64,
}

/// Identity and object registry in one, with auto-incrementing ids from 1.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subject.
    ///
    /// # Errors
    /// `StoreError::Conflict` if the username is taken.
    pub fn register_subject(&self, username: &str) -> Result<SubjectId, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        if state.subjects.contains_key(username) {
            return Err(StoreError::Conflict(format!("subject {:?}", username)));
        }
        state.next_subject += 1;
        let id = SubjectId(state.next_subject);
        state.subjects.insert(username.to_owned(), id);
        tracing::info!(username, subject_id = %id, "registered subject");
        Ok(id)
    }

    /// Registers a new object.
    ///
    /// # Errors
    /// `StoreError::Conflict` if the name is taken.
    pub fn register_object(&self, name: &str) -> Result<ObjectId, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        if state.objects.contains_key(name) {
            return Err(StoreError::Conflict(format!("object {:?}", name)));
        }
        state.next_object += 1;
        let id = ObjectId(state.next_object);
        state.objects.insert(name.to_owned(), id);
        tracing::info!(name, object_id = %id, "registered object");
        Ok(id)
    }
}

impl IdentityRegistry for MemoryDirectory {
    fn resolve_subject(&self, username: &str) -> Result<Option<SubjectId>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.subjects.get(username).copied())
    }
}

impl ObjectRegistry for MemoryDirectory {
    fn resolve_object(&self, name: &str) -> Result<Option<ObjectId>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.objects.get(name).copied())
    }
}

// --- In-memory token store --------------------------------------------------

/// Issued-token records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    records: RwLock<Vec<IssuedTokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, record: IssuedTokenRecord) -> Result<(), StoreError> {
        self.records.write().map_err(|_| StoreError::Poisoned)?.push(record);
        Ok(())
    }

    fn list_by_subject(&self, subject_id: SubjectId) -> Result<Vec<IssuedTokenRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.iter().filter(|r| r.subject_id == subject_id).cloned().collect())
    }

    fn mark_revoked(&self, token: &Token) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        match records.iter_mut().find(|r| &r.token == token) {
            Some(record) => {
                record.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
