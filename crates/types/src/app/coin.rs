// Path: crates/types/src/app/coin.rs
//! A single-denomination token amount.

use crate::error::TxError;
use once_cell::sync::Lazy;
use parity_scale_codec::{Decode, Encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static DENOM_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]{1,31}$"));
static COIN_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*([a-z][a-z0-9]{1,31})$"));

/// An amount of a single denomination, e.g. `2mycoin`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize,
)]
pub struct Coin {
    /// The denomination name.
    pub denom: String,
    /// The amount in the smallest unit of `denom`.
    pub amount: u64,
}

impl Coin {
    /// Creates a coin of `amount` units of `denom`.
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// A zero amount of `denom`.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    /// True if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// True if `denom` is a syntactically valid denomination.
    pub fn is_valid_denom(denom: &str) -> bool {
        match DENOM_RE.as_ref() {
            Ok(re) => re.is_match(denom),
            Err(_) => false,
        }
    }

    /// Stateless well-formedness check.
    pub fn validate(&self) -> Result<(), TxError> {
        if !Self::is_valid_denom(&self.denom) {
            return Err(TxError::InvalidFormat(format!(
                "invalid coin denomination '{}'",
                self.denom
            )));
        }
        Ok(())
    }

    /// Adds `other`, failing on denomination mismatch or overflow.
    pub fn checked_add(&self, other: &Coin) -> Result<Coin, TxError> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| TxError::Internal(format!("coin overflow adding {} to {}", other, self)))?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Subtracts `other`, failing with `InsufficientFunds` if it would go negative.
    pub fn checked_sub(&self, other: &Coin) -> Result<Coin, TxError> {
        self.ensure_same_denom(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or_else(|| {
            TxError::InsufficientFunds(format!("have {}, need {}", self, other))
        })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    fn ensure_same_denom(&self, other: &Coin) -> Result<(), TxError> {
        if self.denom != other.denom {
            return Err(TxError::InvalidFormat(format!(
                "denomination mismatch: {} vs {}",
                self.denom, other.denom
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = COIN_RE
            .as_ref()
            .map_err(|e| TxError::Internal(format!("coin pattern: {}", e)))?;
        let caps = re
            .captures(s.trim())
            .ok_or_else(|| TxError::InvalidFormat(format!("cannot parse coin '{}'", s)))?;
        let amount = caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .parse::<u64>()
            .map_err(|e| TxError::InvalidFormat(format!("coin amount: {}", e)))?;
        let denom = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        Ok(Coin::new(denom, amount))
    }
}
