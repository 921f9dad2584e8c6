// Path: crates/tx/src/system/nonce.rs

//! Core, non-optional system logic for signer-set sequence management.

use strata_api::state::ScopedStore;
use strata_crypto::algorithms::hash::sha256;
use strata_types::app::{Actor, NonceTx};
use strata_types::codec::{from_bytes_canonical, to_bytes_canonical};
use strata_types::error::TxError;
use tracing::debug;

/// Generates the canonical sequence key for a signer set.
///
/// The key is the SHA-256 of the canonical encoding of the sorted,
/// de-duplicated signers, so it does not depend on the order in which a
/// transaction lists them.
pub fn sequence_key(signers: &[Actor]) -> Vec<u8> {
    let mut sorted = signers.to_vec();
    sorted.sort();
    sorted.dedup();
    sha256(to_bytes_canonical(&sorted)).to_vec()
}

/// Reads the last used sequence for `key`; zero if the signer set has never transacted.
pub fn read_sequence(store: &ScopedStore<'_>, key: &[u8]) -> Result<u32, TxError> {
    match store.get(key)? {
        Some(bytes) => from_bytes_canonical(&bytes),
        None => Ok(0),
    }
}

/// Strictly asserts that `tx` carries exactly the next sequence for its
/// signer set. Returns the sequence key and the new sequence on success.
pub fn assert_next_sequence(
    store: &ScopedStore<'_>,
    tx: &NonceTx,
) -> Result<(Vec<u8>, u32), TxError> {
    let key = sequence_key(&tx.signers);
    let current = read_sequence(store, &key)?;
    let expected = current
        .checked_add(1)
        .ok_or_else(|| TxError::Internal("sequence space exhausted".into()))?;

    if tx.sequence != expected {
        return Err(TxError::BadNonce {
            got: tx.sequence,
            expected,
        });
    }
    Ok((key, expected))
}

/// Persists `sequence` as the last used sequence for `key`.
pub fn bump_sequence(
    store: &mut ScopedStore<'_>,
    key: &[u8],
    sequence: u32,
) -> Result<(), TxError> {
    debug!(
        target: "nonce",
        key = %hex::encode(key),
        sequence,
        "advancing signer-set sequence"
    );
    store.set(key, &to_bytes_canonical(&sequence))?;
    Ok(())
}
