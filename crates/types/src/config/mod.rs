// Path: crates/types/src/config/mod.rs

//! Application configuration for the transaction stack.
//!
//! Configuration is read from TOML and may be overridden from the environment.
//! The only environment override the core honours is `<PREFIX>_CHAIN_ID`.
use crate::app::{Actor, Coin};
use crate::error::TxError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CHAIN_ID_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$"));

/// Returns true if `chain_id` matches `^[A-Za-z0-9_-]+$`.
pub fn is_valid_chain_id(chain_id: &str) -> bool {
    match CHAIN_ID_RE.as_ref() {
        Ok(re) => re.is_match(chain_id),
        Err(_) => false,
    }
}

/// Fee policy applied by the fee middleware.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    /// The minimum fee. A zero amount makes the fee layer optional.
    pub min_fee: Coin,
    /// The actor credited with collected fees.
    pub collector: Actor,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            min_fee: Coin::zero(default_fee_denom()),
            collector: Actor::new("fee", b"collector".to_vec()),
        }
    }
}

fn default_fee_denom() -> String {
    "mycoin".to_string()
}

/// Which phases the savepoint middleware wraps.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointConfig {
    /// Wrap `check_tx` in a savepoint.
    #[serde(default = "default_true")]
    pub on_check: bool,
    /// Wrap `deliver_tx` in a savepoint.
    #[serde(default = "default_true")]
    pub on_deliver: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            on_check: true,
            on_deliver: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_env_prefix() -> String {
    "STRATA".to_string()
}

fn default_max_signatures() -> usize {
    7
}

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The chain id. May be left empty and supplied at genesis or via the environment.
    #[serde(default)]
    pub chain_id: String,
    /// Prefix of the environment variables consulted by [`AppConfig::apply_env`].
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
    /// Upper bound on the number of signatures a transaction may carry.
    #[serde(default = "default_max_signatures")]
    pub max_signatures: usize,
    /// Fee policy.
    #[serde(default)]
    pub fee: FeeConfig,
    /// Savepoint policy.
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain_id: String::new(),
            env_prefix: default_env_prefix(),
            max_signatures: default_max_signatures(),
            fee: FeeConfig::default(),
            checkpoint: CheckpointConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, TxError> {
        let cfg: AppConfig =
            toml::from_str(s).map_err(|e| TxError::InvalidFormat(format!("config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The name of the environment variable holding the chain id.
    pub fn chain_id_var(&self) -> String {
        format!("{}_CHAIN_ID", self.env_prefix)
    }

    /// Overrides fields from the process environment.
    pub fn apply_env(self) -> Result<Self, TxError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Overrides fields using `lookup` in place of the process environment.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, TxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup(&self.chain_id_var()) {
            self.chain_id = chain_id;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), TxError> {
        if !self.chain_id.is_empty() && !is_valid_chain_id(&self.chain_id) {
            return Err(TxError::InvalidFormat(format!(
                "invalid chain id '{}'",
                self.chain_id
            )));
        }
        if self.max_signatures == 0 {
            return Err(TxError::InvalidFormat(
                "max_signatures must be at least 1".into(),
            ));
        }
        self.fee.min_fee.validate()
    }
}
