// Path: crates/state/src/primitives/hash/mod.rs
//! Hash-based state root.

use parity_scale_codec::Encode;
use strata_api::state::RootHash;
use strata_crypto::algorithms::hash::sha256_concat;

/// Computes the root hash of a set of key-value pairs.
///
/// Each pair contributes its canonical SCALE encoding, which length-prefixes
/// both the key and the value, so no two distinct states share a preimage.
/// Pairs must be supplied in ascending key order.
pub fn state_root<'a, I>(pairs: I) -> RootHash
where
    I: IntoIterator<Item = (&'a Vec<u8>, &'a Vec<u8>)>,
{
    sha256_concat(pairs.into_iter().map(|pair| pair.encode()))
}
