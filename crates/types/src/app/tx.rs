// Path: crates/types/src/app/tx.rs
//! The transaction envelope.
//!
//! A `Tx` is a closed, tagged sum. The wire encoding is a single type-tag byte
//! followed by the canonical SCALE encoding of the variant. Anti-replay, chain
//! binding, fees and signatures are *layered* variants whose `inner` field is
//! itself a `Tx`; the innermost, non-layered value is the payload that a module
//! handler executes.
//!
//! Modules that need their own payload types do not extend this enum. They
//! encode their payload into a [`CustomTx`] under a tag registered with the
//! transaction registry, which keeps matching on `Tx` exhaustive.

use crate::app::{Actor, Coin};
use parity_scale_codec::{Decode, Encode, EncodeLike, Error as CodecError, Input, Output};

/// Maximum nesting depth accepted when decoding a transaction.
pub const MAX_TX_DEPTH: u32 = 16;

/// Wire tags of the built-in transaction variants.
pub mod tags {
    /// Reserved sentinel; never a legal tag.
    pub const UNASSIGNED: u8 = 0x00;
    /// `Tx::Chain`
    pub const CHAIN: u8 = 0x01;
    /// `Tx::Nonce`
    pub const NONCE: u8 = 0x02;
    /// `Tx::Fee`
    pub const FEE: u8 = 0x03;
    /// `Tx::OneSig`
    pub const ONE_SIG: u8 = 0x04;
    /// `Tx::MultiSig`
    pub const MULTI_SIG: u8 = 0x05;
    /// `Tx::Send`
    pub const SEND: u8 = 0x10;
}

/// Binds a transaction to one chain and, optionally, an expiry height.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ChainTx {
    /// The chain this transaction is valid on.
    pub chain_id: String,
    /// The first height at which the transaction is no longer valid; 0 never expires.
    pub expires_at: u64,
    /// The wrapped transaction.
    pub inner: Box<Tx>,
}

/// Anti-replay wrapper carrying a per-signer-set sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct NonceTx {
    /// Must equal the stored sequence for `signers` plus one.
    pub sequence: u32,
    /// The actors whose combined sequence this transaction advances.
    pub signers: Vec<Actor>,
    /// The wrapped transaction.
    pub inner: Box<Tx>,
}

/// Attaches a fee paid by `payer` before the inner transaction runs.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct FeeTx {
    /// The fee offered.
    pub fee: Coin,
    /// The actor the fee is debited from.
    pub payer: Actor,
    /// The wrapped transaction.
    pub inner: Box<Tx>,
}

/// A public key together with its signature over the wrapper's sign bytes.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Signed {
    /// Raw Ed25519 public key bytes.
    pub pub_key: Vec<u8>,
    /// Raw Ed25519 signature bytes.
    pub signature: Vec<u8>,
}

/// A wrapper accepting exactly one signature.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct OneSigTx {
    /// The signature, once signed.
    pub signed: Option<Signed>,
    /// The wrapped transaction.
    pub inner: Box<Tx>,
}

/// A wrapper accepting any number of signatures over the same sign bytes.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MultiSigTx {
    /// The signatures collected so far.
    pub signed: Vec<Signed>,
    /// The wrapped transaction.
    pub inner: Box<Tx>,
}

/// The coin module's transfer payload.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SendTx {
    /// The actor debited.
    pub from: Actor,
    /// The actor credited.
    pub to: Actor,
    /// The amount moved.
    pub amount: Coin,
}

/// An opaque module-defined payload registered under `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTx {
    /// The registered wire tag.
    pub tag: u8,
    /// The canonical encoding of the module's payload type.
    pub payload: Vec<u8>,
}

/// The transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tx {
    /// Chain binding layer.
    Chain(ChainTx),
    /// Anti-replay layer.
    Nonce(NonceTx),
    /// Fee layer.
    Fee(FeeTx),
    /// Single-signature layer.
    OneSig(OneSigTx),
    /// Multi-signature layer.
    MultiSig(MultiSigTx),
    /// Coin transfer payload.
    Send(SendTx),
    /// Module-registered payload.
    Custom(CustomTx),
}

impl Tx {
    /// The wire tag of this variant.
    pub fn tag(&self) -> u8 {
        match self {
            Tx::Chain(_) => tags::CHAIN,
            Tx::Nonce(_) => tags::NONCE,
            Tx::Fee(_) => tags::FEE,
            Tx::OneSig(_) => tags::ONE_SIG,
            Tx::MultiSig(_) => tags::MULTI_SIG,
            Tx::Send(_) => tags::SEND,
            Tx::Custom(c) => c.tag,
        }
    }

    /// The wrapped transaction, if this is a layered variant.
    pub fn next(&self) -> Option<&Tx> {
        match self {
            Tx::Chain(t) => Some(&t.inner),
            Tx::Nonce(t) => Some(&t.inner),
            Tx::Fee(t) => Some(&t.inner),
            Tx::OneSig(t) => Some(&t.inner),
            Tx::MultiSig(t) => Some(&t.inner),
            Tx::Send(_) | Tx::Custom(_) => None,
        }
    }

    /// True if this variant wraps another transaction.
    pub fn is_layered(&self) -> bool {
        self.next().is_some()
    }

    /// Follows `next` until a non-layered value is reached.
    pub fn innermost(&self) -> &Tx {
        let mut cur = self;
        while let Some(next) = cur.next() {
            cur = next;
        }
        cur
    }

    /// Encodes the transaction to its wire representation.
    pub fn to_wire(&self) -> Vec<u8> {
        self.encode()
    }

    /// Wraps `self` in a chain-binding layer.
    pub fn bind_chain(self, chain_id: impl Into<String>, expires_at: u64) -> Tx {
        Tx::Chain(ChainTx {
            chain_id: chain_id.into(),
            expires_at,
            inner: Box::new(self),
        })
    }

    /// Wraps `self` in an anti-replay layer.
    pub fn with_nonce(self, sequence: u32, signers: Vec<Actor>) -> Tx {
        Tx::Nonce(NonceTx {
            sequence,
            signers,
            inner: Box::new(self),
        })
    }

    /// Wraps `self` in a fee layer.
    pub fn with_fee(self, fee: Coin, payer: Actor) -> Tx {
        Tx::Fee(FeeTx {
            fee,
            payer,
            inner: Box::new(self),
        })
    }
}

impl OneSigTx {
    /// Creates an unsigned wrapper around `inner`.
    pub fn new(inner: Tx) -> Self {
        Self {
            signed: None,
            inner: Box::new(inner),
        }
    }

    /// The bytes a signer commits to: the canonical encoding of the wrapped
    /// transaction, excluding the signature field itself.
    pub fn sign_bytes(&self) -> Vec<u8> {
        self.inner.encode()
    }
}

impl MultiSigTx {
    /// Creates an unsigned wrapper around `inner`.
    pub fn new(inner: Tx) -> Self {
        Self {
            signed: Vec::new(),
            inner: Box::new(inner),
        }
    }

    /// The bytes every signer commits to.
    pub fn sign_bytes(&self) -> Vec<u8> {
        self.inner.encode()
    }
}

impl Encode for Tx {
    fn size_hint(&self) -> usize {
        1 + match self {
            Tx::Chain(t) => t.size_hint(),
            Tx::Nonce(t) => t.size_hint(),
            Tx::Fee(t) => t.size_hint(),
            Tx::OneSig(t) => t.size_hint(),
            Tx::MultiSig(t) => t.size_hint(),
            Tx::Send(t) => t.size_hint(),
            Tx::Custom(c) => c.payload.size_hint(),
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.tag());
        match self {
            Tx::Chain(t) => t.encode_to(dest),
            Tx::Nonce(t) => t.encode_to(dest),
            Tx::Fee(t) => t.encode_to(dest),
            Tx::OneSig(t) => t.encode_to(dest),
            Tx::MultiSig(t) => t.encode_to(dest),
            Tx::Send(t) => t.encode_to(dest),
            Tx::Custom(c) => c.payload.encode_to(dest),
        }
    }
}

impl EncodeLike for Tx {}

impl Decode for Tx {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        input.descend_ref()?;
        let tag = input.read_byte()?;
        let tx = match tag {
            tags::UNASSIGNED => return Err("unassigned transaction tag 0x00".into()),
            tags::CHAIN => Tx::Chain(ChainTx::decode(input)?),
            tags::NONCE => Tx::Nonce(NonceTx::decode(input)?),
            tags::FEE => Tx::Fee(FeeTx::decode(input)?),
            tags::ONE_SIG => Tx::OneSig(OneSigTx::decode(input)?),
            tags::MULTI_SIG => Tx::MultiSig(MultiSigTx::decode(input)?),
            tags::SEND => Tx::Send(SendTx::decode(input)?),
            other => Tx::Custom(CustomTx {
                tag: other,
                payload: Vec::<u8>::decode(input)?,
            }),
        };
        input.ascend_ref();
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parity_scale_codec::DecodeAll;

    fn send() -> Tx {
        Tx::Send(SendTx {
            from: Actor::new("sigs", vec![1; 20]),
            to: Actor::new("sigs", vec![2; 20]),
            amount: Coin::new("mycoin", 400),
        })
    }

    #[test]
    fn wire_format_leads_with_tag() {
        let tx = send().bind_chain("test-chain", 0);
        let bytes = tx.to_wire();
        assert_eq!(bytes[0], tags::CHAIN);
        assert_eq!(Tx::decode_all(&mut bytes.as_slice()).unwrap(), tx);
    }

    #[test]
    fn innermost_unwraps_every_layer() {
        let signer = Actor::new("sigs", vec![1; 20]);
        let tx = Tx::OneSig(OneSigTx::new(
            send()
                .with_fee(Coin::new("mycoin", 2), signer.clone())
                .with_nonce(1, vec![signer])
                .bind_chain("c", 0),
        ));
        assert!(tx.is_layered());
        assert_eq!(tx.innermost(), &send());
        assert!(!send().is_layered());
    }

    #[test]
    fn zero_tag_is_rejected() {
        let mut bytes = send().to_wire();
        bytes[0] = tags::UNASSIGNED;
        assert!(Tx::decode_all(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn custom_payload_roundtrips() {
        let tx = Tx::Custom(CustomTx {
            tag: 0x42,
            payload: vec![9, 8, 7],
        });
        let bytes = tx.to_wire();
        assert_eq!(bytes[0], 0x42);
        assert_eq!(Tx::decode_all(&mut bytes.as_slice()).unwrap(), tx);
    }

    #[test]
    fn sign_bytes_exclude_signatures() {
        let mut one = OneSigTx::new(send());
        let before = one.sign_bytes();
        one.signed = Some(Signed {
            pub_key: vec![1; 32],
            signature: vec![2; 64],
        });
        assert_eq!(before, one.sign_bytes());
        assert_eq!(before, send().to_wire());
    }
}
