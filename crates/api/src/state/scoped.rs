// Path: crates/api/src/state/scoped.rs

//! A namespaced, checkpointable view over a `KvStore`.
//!
//! Every layer of the stack receives a `ScopedStore`. Keys passed to
//! [`ScopedStore::get`], [`ScopedStore::set`] and [`ScopedStore::delete`] are
//! qualified with the view's prefix, which is the concatenation of every
//! enclosing namespace name followed by a zero byte. Views nest by
//! reborrowing their parent, so the borrow checker guarantees a parent is
//! never touched while a child is alive.
//!
//! As a [`KvStore`], a scoped store is addressed by *absolute* keys. This is
//! what child views write through, and what lets a view re-rooted with
//! [`ScopedStore::rebase`] still publish into an enclosing savepoint.

use crate::state::overlay::{split_write_set, WriteSet};
use crate::state::KvStore;
use strata_types::error::StateError;
use strata_types::keys::{namespace_prefix, NAMESPACE_SEPARATOR};

/// Whether a view writes through to its parent or buffers its writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Writes go straight to the parent.
    Live,
    /// Writes are buffered until [`ScopedStore::commit`].
    Checkpointed,
}

/// A namespaced view of a key-value store. See the module documentation.
pub struct ScopedStore<'a> {
    base: &'a mut dyn KvStore,
    prefix: Vec<u8>,
    mode: StoreMode,
    writes: WriteSet,
}

fn check_namespace(name: &str) -> Result<(), StateError> {
    if name.is_empty() || name.as_bytes().contains(&NAMESPACE_SEPARATOR) {
        return Err(StateError::PermissionDenied(format!(
            "invalid namespace name {:?}",
            name
        )));
    }
    Ok(())
}

impl<'a> ScopedStore<'a> {
    /// Creates a live, unprefixed view over `base`.
    pub fn new(base: &'a mut dyn KvStore) -> Self {
        Self {
            base,
            prefix: Vec::new(),
            mode: StoreMode::Live,
            writes: WriteSet::new(),
        }
    }

    /// The absolute prefix applied to every key of this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Whether this view buffers its writes.
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Number of buffered writes awaiting [`ScopedStore::commit`].
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    fn qualify(&self, key: &[u8]) -> Vec<u8> {
        [self.prefix.as_slice(), key].concat()
    }

    /// Reads `key` within this view's namespace.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.read_raw(&self.qualify(key))
    }

    /// Writes `key` within this view's namespace.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        let key = self.qualify(key);
        self.write_raw(key, Some(value.to_vec()))
    }

    /// Deletes `key` within this view's namespace.
    pub fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        let key = self.qualify(key);
        self.write_raw(key, None)
    }

    /// A live child view whose prefix is this view's prefix followed by `name`
    /// and a zero separator.
    ///
    /// Fails if `name` is empty or contains a zero byte, either of which would
    /// break the injectivity of the prefix encoding.
    pub fn namespace(&mut self, name: &str) -> Result<ScopedStore<'_>, StateError> {
        check_namespace(name)?;
        let prefix = [self.prefix.as_slice(), &namespace_prefix(name)].concat();
        Ok(ScopedStore {
            base: self,
            prefix,
            mode: StoreMode::Live,
            writes: WriteSet::new(),
        })
    }

    /// A child view with the same prefix whose writes stay invisible to this
    /// view until the child is committed.
    pub fn checkpoint(&mut self) -> ScopedStore<'_> {
        let prefix = self.prefix.clone();
        ScopedStore {
            base: self,
            prefix,
            mode: StoreMode::Checkpointed,
            writes: WriteSet::new(),
        }
    }

    /// A live child view with an absolute `prefix`, writing through this view.
    pub fn rebase(&mut self, prefix: Vec<u8>) -> ScopedStore<'_> {
        ScopedStore {
            base: self,
            prefix,
            mode: StoreMode::Live,
            writes: WriteSet::new(),
        }
    }

    /// Publishes every buffered write to the parent in a single batch.
    /// A no-op for live views.
    pub fn commit(mut self) -> Result<(), StateError> {
        if self.writes.is_empty() {
            return Ok(());
        }
        let (inserts, deletes) = split_write_set(std::mem::take(&mut self.writes));
        self.base.batch_apply(&inserts, &deletes)
    }

    /// Drops every buffered write. Dropping the view has the same effect.
    pub fn discard(self) {}

    fn read_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn write_raw(&mut self, key: Vec<u8>, value: Option<Vec<u8>>) -> Result<(), StateError> {
        match self.mode {
            StoreMode::Checkpointed => {
                self.writes.insert(key, value);
                Ok(())
            }
            StoreMode::Live => match value {
                Some(v) => self.base.insert(&key, &v),
                None => self.base.delete(&key),
            },
        }
    }
}

impl<'a> KvStore for ScopedStore<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.read_raw(key)
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.write_raw(key.to_vec(), Some(value.to_vec()))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.write_raw(key.to_vec(), None)
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        match self.mode {
            StoreMode::Checkpointed => {
                for key in deletes {
                    self.writes.insert(key.clone(), None);
                }
                for (key, value) in inserts {
                    self.writes.insert(key.clone(), Some(value.clone()));
                }
                Ok(())
            }
            StoreMode::Live => self.base.batch_apply(inserts, deletes),
        }
    }
}

impl std::fmt::Debug for ScopedStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedStore")
            .field("prefix", &String::from_utf8_lossy(&self.prefix))
            .field("mode", &self.mode)
            .field("pending", &self.writes.len())
            .finish()
    }
}
