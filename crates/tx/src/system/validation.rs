// Path: crates/tx/src/system/validation.rs

//! Core, non-optional system logic for transaction signature validation.

use strata_crypto::sign::eddsa::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use strata_types::app::{MultiSigTx, OneSigTx, Signed, Tx};
use strata_types::error::TxError;

/// A centralized helper for verifying one signature over `message`.
fn verify_signed(signed: &Signed, message: &[u8]) -> Result<Ed25519PublicKey, TxError> {
    let pk = Ed25519PublicKey::from_bytes(&signed.pub_key)
        .map_err(|e| TxError::InvalidSignature(e.to_string()))?;
    let sig = Ed25519Signature::from_bytes(&signed.signature)
        .map_err(|e| TxError::InvalidSignature(e.to_string()))?;
    pk.verify(message, &sig).map_err(|e| {
        TxError::InvalidSignature(format!(
            "signature by {} does not verify: {}",
            hex::encode(pk.to_bytes()),
            e
        ))
    })?;
    Ok(pk)
}

fn signed_by(key: &Ed25519KeyPair, message: &[u8]) -> Signed {
    Signed {
        pub_key: key.public_key().to_bytes(),
        signature: key.sign(message).to_bytes(),
    }
}

/// The signing capability of a signature wrapper.
///
/// Sign bytes are the canonical encoding of the wrapped transaction and never
/// include the signatures themselves, so every signer of a multi-signature
/// wrapper commits to the same bytes.
pub trait SignatureLayer {
    /// Adds a signature by `key`.
    fn sign(&mut self, key: &Ed25519KeyPair) -> Result<(), TxError>;

    /// Verifies every signature and returns the signing keys in order.
    ///
    /// Fails with `MissingSignature` if there are none and
    /// `InvalidSignature` if any does not verify.
    fn signers(&self) -> Result<Vec<Ed25519PublicKey>, TxError>;

    /// The number of signatures attached.
    fn signature_count(&self) -> usize;
}

impl SignatureLayer for OneSigTx {
    fn sign(&mut self, key: &Ed25519KeyPair) -> Result<(), TxError> {
        if self.signed.is_some() {
            return Err(TxError::TooManySignatures { count: 2, limit: 1 });
        }
        self.signed = Some(signed_by(key, &self.sign_bytes()));
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Ed25519PublicKey>, TxError> {
        let signed = self.signed.as_ref().ok_or(TxError::MissingSignature)?;
        Ok(vec![verify_signed(signed, &self.sign_bytes())?])
    }

    fn signature_count(&self) -> usize {
        usize::from(self.signed.is_some())
    }
}

impl SignatureLayer for MultiSigTx {
    fn sign(&mut self, key: &Ed25519KeyPair) -> Result<(), TxError> {
        let signed = signed_by(key, &self.sign_bytes());
        self.signed.push(signed);
        Ok(())
    }

    fn signers(&self) -> Result<Vec<Ed25519PublicKey>, TxError> {
        if self.signed.is_empty() {
            return Err(TxError::MissingSignature);
        }
        let message = self.sign_bytes();
        self.signed
            .iter()
            .map(|signed| verify_signed(signed, &message))
            .collect()
    }

    fn signature_count(&self) -> usize {
        self.signed.len()
    }
}

/// Returns the signature layer of `tx`, if its outermost variant is one.
pub fn signature_layer(tx: &Tx) -> Option<&dyn SignatureLayer> {
    match tx {
        Tx::OneSig(t) => Some(t),
        Tx::MultiSig(t) => Some(t),
        _ => None,
    }
}
