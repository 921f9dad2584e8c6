// Path: crates/tx/src/registry.rs

//! The transaction type registry.
//!
//! The registry is an explicit value built once at application start and
//! handed to the driver and the dispatcher. It maps every wire tag to a type
//! name, the module that executes it, and a stateless validator.

use parity_scale_codec::{Decode, DecodeLimit, Encode};
use std::collections::BTreeMap;
use strata_types::app::{tags, CustomTx, Tx, MAX_TX_DEPTH};
use strata_types::codec::from_bytes_canonical;
use strata_types::config::is_valid_chain_id;
use strata_types::error::TxError;
use thiserror::Error;

/// A module-defined payload carried as [`Tx::Custom`].
pub trait TxPayload: Encode + Decode + Sized + 'static {
    /// The wire tag. Must be non-zero and unique within a registry.
    const TAG: u8;
    /// The type name, e.g. `"counter/incr"`. Must be unique within a registry.
    const NAME: &'static str;
    /// The module whose handler executes this payload.
    const MODULE: &'static str;

    /// Stateless well-formedness checks.
    fn validate_basic(&self) -> Result<(), TxError> {
        Ok(())
    }

    /// Wraps the payload in the transaction envelope.
    fn to_tx(&self) -> Tx {
        Tx::Custom(CustomTx {
            tag: Self::TAG,
            payload: self.encode(),
        })
    }

    /// Extracts the payload from `tx` if it carries this type.
    fn from_tx(tx: &Tx) -> Result<Option<Self>, TxError> {
        match tx {
            Tx::Custom(custom) if custom.tag == Self::TAG => {
                from_bytes_canonical(&custom.payload).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// Errors raised while building a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Tag 0x00 is the unassigned sentinel.
    #[error("Tag 0x00 is reserved and cannot be registered (type '{0}')")]
    ReservedTag(String),
    /// Another type already uses this tag.
    #[error("Tag 0x{tag:02x} is already registered to '{existing}'")]
    DuplicateTag {
        /// The contested tag.
        tag: u8,
        /// The name registered first.
        existing: String,
    },
    /// Another type already uses this name.
    #[error("Type name '{0}' is already registered")]
    DuplicateName(String),
}

impl From<RegistryError> for TxError {
    fn from(e: RegistryError) -> Self {
        TxError::Internal(e.to_string())
    }
}

type Validator = fn(&[u8]) -> Result<(), TxError>;

/// What the registry knows about one wire tag.
#[derive(Clone)]
pub struct Registration {
    /// The wire tag.
    pub tag: u8,
    /// The unique type name.
    pub name: String,
    /// The module that executes the type.
    pub module: String,
    validator: Option<Validator>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("module", &self.module)
            .finish()
    }
}

fn validate_payload<T: TxPayload>(bytes: &[u8]) -> Result<(), TxError> {
    from_bytes_canonical::<T>(bytes)?.validate_basic()
}

/// Maps wire tags to type names, owning modules and stateless validators.
#[derive(Debug, Clone)]
pub struct TxRegistry {
    by_tag: BTreeMap<u8, Registration>,
    by_name: BTreeMap<String, u8>,
}

impl Default for TxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TxRegistry {
    /// A registry holding the built-in layers and the coin transfer.
    pub fn new() -> Self {
        let mut registry = Self {
            by_tag: BTreeMap::new(),
            by_name: BTreeMap::new(),
        };
        let builtins: [(u8, &str, &str); 6] = [
            (tags::CHAIN, "chain", "chain"),
            (tags::NONCE, "nonce", "nonce"),
            (tags::FEE, "fee", "fee"),
            (tags::ONE_SIG, "sigs/one", "sigs"),
            (tags::MULTI_SIG, "sigs/multi", "sigs"),
            (tags::SEND, "coin/send", "coin"),
        ];
        for (tag, name, module) in builtins {
            registry.by_tag.insert(
                tag,
                Registration {
                    tag,
                    name: name.to_string(),
                    module: module.to_string(),
                    validator: None,
                },
            );
            registry.by_name.insert(name.to_string(), tag);
        }
        registry
    }

    /// Registers a module payload type.
    pub fn register<T: TxPayload>(&mut self) -> Result<(), RegistryError> {
        self.insert(Registration {
            tag: T::TAG,
            name: T::NAME.to_string(),
            module: T::MODULE.to_string(),
            validator: Some(validate_payload::<T>),
        })
    }

    /// Builder-style [`TxRegistry::register`].
    pub fn with<T: TxPayload>(mut self) -> Result<Self, RegistryError> {
        self.register::<T>()?;
        Ok(self)
    }

    fn insert(&mut self, registration: Registration) -> Result<(), RegistryError> {
        if registration.tag == tags::UNASSIGNED {
            return Err(RegistryError::ReservedTag(registration.name));
        }
        if let Some(existing) = self.by_tag.get(&registration.tag) {
            return Err(RegistryError::DuplicateTag {
                tag: registration.tag,
                existing: existing.name.clone(),
            });
        }
        if self.by_name.contains_key(&registration.name) {
            return Err(RegistryError::DuplicateName(registration.name));
        }
        tracing::debug!(
            target: "registry",
            tag = registration.tag,
            name = %registration.name,
            module = %registration.module,
            "registered transaction type"
        );
        self.by_name
            .insert(registration.name.clone(), registration.tag);
        self.by_tag.insert(registration.tag, registration);
        Ok(())
    }

    /// The registration for `tag`.
    pub fn get(&self, tag: u8) -> Option<&Registration> {
        self.by_tag.get(&tag)
    }

    /// The registered type name for `tag`.
    pub fn type_name(&self, tag: u8) -> Option<&str> {
        self.get(tag).map(|r| r.name.as_str())
    }

    /// The wire tag registered under `name`.
    pub fn tag_of(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    fn lookup(&self, tag: u8) -> Result<&Registration, TxError> {
        self.get(tag)
            .ok_or_else(|| TxError::UnknownTxType(format!("unregistered tag 0x{:02x}", tag)))
    }

    /// The module that executes the innermost payload of `tx`.
    pub fn module_of(&self, tx: &Tx) -> Result<&str, TxError> {
        let inner = tx.innermost();
        self.lookup(inner.tag()).map(|r| r.module.as_str())
    }

    /// Decodes wire bytes into a transaction.
    ///
    /// Fails with `UnknownTxType` if the leading tag, or the tag of any
    /// nested layer or payload, is not registered, and with `InvalidFormat`
    /// on empty, truncated or trailing input.
    pub fn decode(&self, bytes: &[u8]) -> Result<Tx, TxError> {
        let first = *bytes
            .first()
            .ok_or_else(|| TxError::InvalidFormat("empty transaction".into()))?;
        self.lookup(first)?;

        let mut input = bytes;
        let tx = Tx::decode_all_with_depth_limit(MAX_TX_DEPTH, &mut input)
            .map_err(|e| TxError::InvalidFormat(format!("transaction decode failed: {}", e)))?;

        let mut layer = Some(&tx);
        while let Some(cur) = layer {
            self.lookup(cur.tag())?;
            layer = cur.next();
        }
        Ok(tx)
    }

    /// Stateless well-formedness checks on every layer of `tx`, including
    /// the registered validator of a module payload.
    pub fn validate_basic(&self, tx: &Tx) -> Result<(), TxError> {
        match tx {
            Tx::Chain(t) => {
                if !is_valid_chain_id(&t.chain_id) {
                    return Err(TxError::InvalidFormat(format!(
                        "invalid chain id '{}'",
                        t.chain_id
                    )));
                }
            }
            Tx::Nonce(t) => {
                if t.signers.is_empty() {
                    return Err(TxError::InvalidFormat("nonce layer has no signers".into()));
                }
                if t.sequence == 0 {
                    return Err(TxError::InvalidFormat("sequence must be positive".into()));
                }
            }
            Tx::Fee(t) => {
                t.fee.validate()?;
                if t.payer.address.is_empty() {
                    return Err(TxError::InvalidFormat("fee payer has no address".into()));
                }
            }
            Tx::OneSig(t) => {
                if t.signed.is_none() {
                    return Err(TxError::MissingSignature);
                }
            }
            Tx::MultiSig(t) => {
                if t.signed.is_empty() {
                    return Err(TxError::MissingSignature);
                }
            }
            Tx::Send(t) => {
                t.amount.validate()?;
                if t.amount.is_zero() {
                    return Err(TxError::InvalidFormat("cannot send a zero amount".into()));
                }
                if t.from.address.is_empty() || t.to.address.is_empty() {
                    return Err(TxError::InvalidFormat("send requires both parties".into()));
                }
            }
            Tx::Custom(custom) => {
                let registration = self.lookup(custom.tag)?;
                if let Some(validate) = registration.validator {
                    validate(&custom.payload)?;
                }
            }
        }
        match tx.next() {
            Some(next) => self.validate_basic(next),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_types::app::{Actor, Coin, SendTx};

    #[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
    struct Incr {
        by: u32,
    }

    impl TxPayload for Incr {
        const TAG: u8 = 0x40;
        const NAME: &'static str = "counter/incr";
        const MODULE: &'static str = "counter";

        fn validate_basic(&self) -> Result<(), TxError> {
            if self.by == 0 {
                return Err(TxError::InvalidFormat("zero increment".into()));
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
    struct Clash;

    impl TxPayload for Clash {
        const TAG: u8 = tags::SEND;
        const NAME: &'static str = "clash";
        const MODULE: &'static str = "clash";
    }

    #[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
    struct Zero;

    impl TxPayload for Zero {
        const TAG: u8 = 0;
        const NAME: &'static str = "zero";
        const MODULE: &'static str = "zero";
    }

    fn send(amount: u64) -> Tx {
        Tx::Send(SendTx {
            from: Actor::new("sigs", vec![1; 20]),
            to: Actor::new("sigs", vec![2; 20]),
            amount: Coin::new("mycoin", amount),
        })
    }

    #[test]
    fn registration_rejects_collisions_and_zero() {
        let mut registry = TxRegistry::new();
        registry.register::<Incr>().unwrap();
        assert_eq!(
            registry.register::<Incr>(),
            Err(RegistryError::DuplicateTag {
                tag: 0x40,
                existing: "counter/incr".into()
            })
        );
        assert!(matches!(
            registry.register::<Clash>(),
            Err(RegistryError::DuplicateTag { .. })
        ));
        assert!(matches!(
            registry.register::<Zero>(),
            Err(RegistryError::ReservedTag(_))
        ));
        assert_eq!(registry.type_name(0x40), Some("counter/incr"));
        assert_eq!(registry.tag_of("coin/send"), Some(tags::SEND));
    }

    #[test]
    fn decode_classifies_failures() {
        let registry = TxRegistry::new();
        assert!(matches!(registry.decode(&[]), Err(TxError::InvalidFormat(_))));
        assert!(matches!(registry.decode(&[0x00, 1]), Err(TxError::UnknownTxType(_))));
        assert!(matches!(registry.decode(&[0x7f, 0]), Err(TxError::UnknownTxType(_))));

        let mut truncated = send(5).to_wire();
        truncated.pop();
        assert!(matches!(registry.decode(&truncated), Err(TxError::InvalidFormat(_))));

        let nested = Incr { by: 1 }.to_tx().bind_chain("c", 0).to_wire();
        assert!(matches!(registry.decode(&nested), Err(TxError::UnknownTxType(_))));
    }

    #[test]
    fn custom_payloads_route_to_their_module() {
        let registry = TxRegistry::new().with::<Incr>().unwrap();
        let tx = registry
            .decode(&Incr { by: 3 }.to_tx().bind_chain("c", 0).to_wire())
            .unwrap();
        assert_eq!(registry.module_of(&tx).unwrap(), "counter");
        assert_eq!(Incr::from_tx(tx.innermost()).unwrap(), Some(Incr { by: 3 }));
        assert_eq!(registry.module_of(&send(1)).unwrap(), "coin");
    }

    #[test]
    fn validate_basic_recurses_into_layers() {
        let registry = TxRegistry::new().with::<Incr>().unwrap();
        assert!(registry.validate_basic(&send(1).bind_chain("ok-chain", 0)).is_ok());
        assert!(matches!(
            registry.validate_basic(&send(0).bind_chain("ok-chain", 0)),
            Err(TxError::InvalidFormat(_))
        ));
        assert!(matches!(
            registry.validate_basic(&send(1).bind_chain("bad chain!", 0)),
            Err(TxError::InvalidFormat(_))
        ));
        assert!(matches!(
            registry.validate_basic(&Incr { by: 0 }.to_tx().with_nonce(1, vec![Actor::new("sigs", vec![1])])),
            Err(TxError::InvalidFormat(_))
        ));
        assert!(matches!(
            registry.validate_basic(&send(1).with_nonce(0, vec![Actor::new("sigs", vec![1])])),
            Err(TxError::InvalidFormat(_))
        ));
    }

    proptest! {
        #[test]
        fn layered_transactions_roundtrip(
            amount in 1u64..u64::MAX,
            sequence in 1u32..u32::MAX,
            fee in 0u64..1_000,
            expires_at in any::<u64>(),
            addr in proptest::collection::vec(any::<u8>(), 1..32),
        ) {
            let registry = TxRegistry::new();
            let signer = Actor::new("sigs", addr);
            let tx = Tx::Send(SendTx {
                from: signer.clone(),
                to: Actor::new("sigs", vec![9; 20]),
                amount: Coin::new("mycoin", amount),
            })
            .with_fee(Coin::new("mycoin", fee), signer.clone())
            .with_nonce(sequence, vec![signer])
            .bind_chain("test-chain", expires_at);
            prop_assert_eq!(registry.decode(&tx.to_wire()).unwrap(), tx);
        }

        #[test]
        fn unregistered_leading_tags_are_unknown(
            tag in 0x11u8..=0xff,
            rest in proptest::collection::vec(any::<u8>(), 0..16),
        ) {
            let registry = TxRegistry::new();
            let mut bytes = vec![tag];
            bytes.extend(rest);
            prop_assert!(matches!(registry.decode(&bytes), Err(TxError::UnknownTxType(_))));
        }
    }
}
