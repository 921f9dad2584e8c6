// Path: crates/types/src/app/actor.rs
//! Defines the `Actor`, the namespaced principal used for all permission checks.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A principal identifier: `{chain_id, module, address}`.
///
/// Two actors are equal iff all three fields are equal. `chain_id` is empty for
/// local actors and non-empty only for cross-chain (IBC) principals. The
/// `module` field names the component that vouches for the actor, so an address
/// authenticated by the signature layer (`sigs`) is a different principal from
/// the same bytes minted by any other module.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Encode,
    Decode,
    Serialize,
    Deserialize,
)]
pub struct Actor {
    /// The chain this actor lives on. Empty for local actors.
    #[serde(default)]
    pub chain_id: String,
    /// The module that is authorized to vouch for this actor.
    pub module: String,
    /// The raw address bytes, interpreted by the owning module.
    #[serde(with = "hex::serde")]
    pub address: Vec<u8>,
}

impl Actor {
    /// Creates a local actor owned by `module`.
    pub fn new(module: impl Into<String>, address: impl Into<Vec<u8>>) -> Self {
        Self {
            chain_id: String::new(),
            module: module.into(),
            address: address.into(),
        }
    }

    /// Returns a copy of this actor bound to a remote chain.
    pub fn on_chain(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// True if the actor belongs to the local chain.
    pub fn is_local(&self) -> bool {
        self.chain_id.is_empty()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() {
            write!(f, "{}:{}", self.module, hex::encode(&self.address))
        } else {
            write!(
                f,
                "{}/{}:{}",
                self.chain_id,
                self.module,
                hex::encode(&self.address)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_all_fields() {
        let a = Actor::new("sigs", vec![1, 2, 3]);
        assert_eq!(a, Actor::new("sigs", vec![1, 2, 3]));
        assert_ne!(a, Actor::new("coin", vec![1, 2, 3]));
        assert_ne!(a, Actor::new("sigs", vec![1, 2, 4]));
        assert_ne!(a, a.clone().on_chain("remote"));
    }

    #[test]
    fn display_distinguishes_remote_actors() {
        let local = Actor::new("sigs", vec![0xab]);
        assert_eq!(local.to_string(), "sigs:ab");
        assert_eq!(local.on_chain("hub").to_string(), "hub/sigs:ab");
    }

    #[test]
    fn json_uses_hex_addresses() {
        let actor: Actor =
            serde_json::from_str(r#"{"module":"sigs","address":"0a0b"}"#).unwrap();
        assert!(actor.is_local());
        assert_eq!(actor.address, vec![0x0a, 0x0b]);
    }
}
