// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay used as the check cache.

use crate::state::KvStore;
use std::collections::BTreeMap;
use strata_types::error::StateError;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A batch of keys to be deleted from the state.
pub type StateDeletes = Vec<Vec<u8>>;

/// A complete set of state changes (inserts/updates and deletes).
pub type StateChangeSet = (StateInserts, StateDeletes);

/// Buffered writes keyed by absolute key. `None` marks a deletion.
pub type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// An in-memory, copy-on-write overlay for any `KvStore`.
///
/// Reads are first checked against the local `writes` cache. If a key is not
/// found, the read is passed through to the underlying `base` state.
/// All writes are captured in the local cache and never affect the `base` state.
#[derive(Clone)]
pub struct StateOverlay<'a> {
    base: &'a dyn KvStore,
    writes: WriteSet,
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn KvStore) -> Self {
        Self::with_writes(base, WriteSet::new())
    }

    /// Resumes an overlay from writes captured by an earlier one.
    pub fn with_writes(base: &'a dyn KvStore, writes: WriteSet) -> Self {
        Self { base, writes }
    }

    /// True if no writes have been captured.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consumes the overlay and returns the raw write set, so it can be resumed later.
    pub fn into_writes(self) -> WriteSet {
        self.writes
    }

    /// Consumes the overlay and returns its writes in a deterministic order.
    pub fn into_ordered_batch(self) -> StateChangeSet {
        split_write_set(self.writes)
    }
}

/// Splits a write set into ordered inserts and deletes.
pub fn split_write_set(writes: WriteSet) -> StateChangeSet {
    let mut inserts = Vec::new();
    let mut deletes = Vec::new();

    for (key, value_opt) in writes {
        match value_opt {
            Some(value) => inserts.push((key, value)),
            None => deletes.push(key),
        }
    }
    (inserts, deletes)
}

impl<'a> KvStore for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.writes.insert(key.clone(), None);
        }
        for (key, value) in inserts {
            self.writes.insert(key.clone(), Some(value.clone()));
        }
        Ok(())
    }
}
