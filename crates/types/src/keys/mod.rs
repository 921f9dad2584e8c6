// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys and the namespace encoding.
//!
//! Every key written through a scoped store is prefixed with the bytes of
//! its namespace followed by [`NAMESPACE_SEPARATOR`]. The stack re-roots
//! each layer, so a middleware key `k` persists as `<middleware>\x00k` and
//! a module key as `<module>\x00k`.

/// The byte separating a namespace from the keys beneath it.
pub const NAMESPACE_SEPARATOR: u8 = 0x00;

/// The namespace the application driver reserves for its own bookkeeping.
pub const BASE_NAMESPACE: &str = "base";

/// The key (under [`BASE_NAMESPACE`]) holding the chain id set at genesis.
pub const CHAIN_ID_KEY: &[u8] = b"chain_id";

/// The key (under [`BASE_NAMESPACE`]) holding the last committed height.
pub const HEIGHT_KEY: &[u8] = b"height";

/// The genesis option path that sets the chain id.
pub const CHAIN_ID_OPTION: &str = "base/chain_id";

/// Builds the prefix a namespace contributes to every key beneath it.
///
/// # Example
/// `namespace_prefix("nonce")` -> `b"nonce\x00"`
pub fn namespace_prefix(name: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(name.len() + 1);
    prefix.extend_from_slice(name.as_bytes());
    prefix.push(NAMESPACE_SEPARATOR);
    prefix
}

/// Prefixes `key` with the namespace `name`.
pub fn namespaced_key(name: &str, key: &[u8]) -> Vec<u8> {
    [namespace_prefix(name).as_slice(), key].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_concatenate() {
        let outer = namespace_prefix("fee");
        let full = [outer.as_slice(), &namespaced_key("coin", b"k")].concat();
        assert_eq!(full, b"fee\x00coin\x00k".to_vec());
    }
}
