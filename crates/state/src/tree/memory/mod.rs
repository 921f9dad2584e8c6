// Path: crates/state/src/tree/memory/mod.rs
//! An ordered in-memory `CommitStore`.

use crate::primitives::hash::state_root;
use std::collections::BTreeMap;
use strata_api::state::{CommitStore, KvStore, RootHash};
use strata_types::error::StateError;

/// A read-only snapshot of committed key-value pairs.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Snapshot {
    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the snapshot holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvStore for Snapshot {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], _value: &[u8]) -> Result<(), StateError> {
        Err(StateError::PermissionDenied(format!(
            "write to committed snapshot at key {}",
            hex::encode(key)
        )))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        Err(StateError::PermissionDenied(format!(
            "delete from committed snapshot at key {}",
            hex::encode(key)
        )))
    }

    fn batch_apply(
        &mut self,
        _inserts: &[(Vec<u8>, Vec<u8>)],
        _deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        Err(StateError::PermissionDenied(
            "batch apply on committed snapshot".into(),
        ))
    }
}

/// An in-memory store with a working and a committed generation.
///
/// Writes through the [`KvStore`] methods land in the working generation.
/// [`CommitStore::commit`] copies it into the committed generation and
/// recomputes the state root.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    working: BTreeMap<Vec<u8>, Vec<u8>>,
    committed: Snapshot,
    version: u64,
    root: RootHash,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store at version 0.
    pub fn new() -> Self {
        let working = BTreeMap::new();
        let root = state_root(&working);
        Self {
            working,
            committed: Snapshot::default(),
            version: 0,
            root,
        }
    }

    /// True if the working generation differs from the committed one.
    pub fn is_dirty(&self) -> bool {
        self.working != self.committed.data
    }

    /// Iterates the working generation in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.working
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.working.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.working.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.working.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.working.remove(key);
        }
        for (key, value) in inserts {
            self.working.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

impl CommitStore for MemoryStore {
    fn committed(&self) -> &dyn KvStore {
        &self.committed
    }

    fn commit(&mut self) -> Result<RootHash, StateError> {
        self.root = state_root(&self.working);
        self.committed.data = self.working.clone();
        self.version = self.version.saturating_add(1);
        tracing::debug!(
            target: "state",
            version = self.version,
            keys = self.working.len(),
            root = %hex::encode(self.root),
            "Committed state"
        );
        Ok(self.root)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn root_hash(&self) -> RootHash {
        self.root
    }
}
