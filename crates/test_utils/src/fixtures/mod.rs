//! Fixtures for reproducible tests: deterministic keys and layered transactions.

use strata_crypto::sign::eddsa::Ed25519KeyPair;
use strata_tx::SignatureLayer;
use strata_types::app::{Actor, Coin, MultiSigTx, OneSigTx, SendTx, Tx};
use strata_types::error::TxError;

/// The chain id used throughout the test suites.
pub const TEST_CHAIN_ID: &str = "test-chain";

/// The denomination used throughout the test suites.
pub const TEST_DENOM: &str = "mycoin";

/// A key pair derived from a fixed seed: every byte of the seed is `seed`.
pub fn keypair(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed(&[seed; 32])
}

/// The actor the signature layer grants for `key`.
pub fn sig_actor(key: &Ed25519KeyPair) -> Actor {
    Actor::new("sigs", key.public_key().address())
}

/// `amount` of the test denomination.
pub fn coins(amount: u64) -> Coin {
    Coin::new(TEST_DENOM, amount)
}

/// A coin transfer payload.
pub fn send(from: &Actor, to: &Actor, amount: u64) -> Tx {
    Tx::Send(SendTx {
        from: from.clone(),
        to: to.clone(),
        amount: coins(amount),
    })
}

/// Wraps a payload in the standard layers, innermost first:
/// fee, nonce, chain binding, then a signature wrapper.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    payload: Tx,
    fee: Option<(Coin, Actor)>,
    nonce: Option<(u32, Vec<Actor>)>,
    chain: Option<(String, u64)>,
}

impl TxBuilder {
    /// Starts from `payload`.
    pub fn new(payload: Tx) -> Self {
        Self {
            payload,
            fee: None,
            nonce: None,
            chain: None,
        }
    }

    /// Adds a fee paid by `payer`.
    pub fn fee(mut self, fee: Coin, payer: &Actor) -> Self {
        self.fee = Some((fee, payer.clone()));
        self
    }

    /// Adds an anti-replay layer.
    pub fn nonce(mut self, sequence: u32, signers: &[Actor]) -> Self {
        self.nonce = Some((sequence, signers.to_vec()));
        self
    }

    /// Binds to `chain_id` with no expiry.
    pub fn chain(self, chain_id: &str) -> Self {
        self.chain_expiring(chain_id, 0)
    }

    /// Binds to `chain_id`, expiring at `expires_at`.
    pub fn chain_expiring(mut self, chain_id: &str, expires_at: u64) -> Self {
        self.chain = Some((chain_id.to_string(), expires_at));
        self
    }

    /// The layered transaction without a signature wrapper.
    pub fn unsigned(self) -> Tx {
        let mut tx = self.payload;
        if let Some((fee, payer)) = self.fee {
            tx = tx.with_fee(fee, payer);
        }
        if let Some((sequence, signers)) = self.nonce {
            tx = tx.with_nonce(sequence, signers);
        }
        if let Some((chain_id, expires_at)) = self.chain {
            tx = tx.bind_chain(chain_id, expires_at);
        }
        tx
    }

    /// Wraps in a single-signature layer signed by `key`.
    pub fn sign(self, key: &Ed25519KeyPair) -> Result<Tx, TxError> {
        let mut wrapper = OneSigTx::new(self.unsigned());
        wrapper.sign(key)?;
        Ok(Tx::OneSig(wrapper))
    }

    /// Wraps in a multi-signature layer signed by every key in order.
    pub fn sign_all(self, keys: &[&Ed25519KeyPair]) -> Result<Tx, TxError> {
        let mut wrapper = MultiSigTx::new(self.unsigned());
        for key in keys {
            wrapper.sign(key)?;
        }
        Ok(Tx::MultiSig(wrapper))
    }
}
