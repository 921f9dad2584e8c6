// Path: crates/api/src/state/manager.rs
//! Defines the `CommitStore` trait for versioning the deliver state.

use crate::state::KvStore;
use strata_types::error::StateError;

/// A 32-byte commitment to the full contents of a store.
pub type RootHash = [u8; 32];

/// A store with two logical generations: the *working* state written through
/// its [`KvStore`] methods, and the last *committed* state.
///
/// The application driver delivers transactions into the working state and
/// serves `check_tx` and queries from the committed state, so check-time
/// writes can never reach what is persisted.
pub trait CommitStore: KvStore {
    /// A read-only view of the last committed state.
    fn committed(&self) -> &dyn KvStore;

    /// Seals the working state as the new committed state and returns its root hash.
    fn commit(&mut self) -> Result<RootHash, StateError>;

    /// The number of commits performed so far.
    fn version(&self) -> u64;

    /// The root hash of the last committed state.
    fn root_hash(&self) -> RootHash;
}

impl<T: CommitStore + ?Sized> CommitStore for Box<T> {
    fn committed(&self) -> &dyn KvStore {
        (**self).committed()
    }

    fn commit(&mut self) -> Result<RootHash, StateError> {
        (**self).commit()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }

    fn root_hash(&self) -> RootHash {
        (**self).root_hash()
    }
}
