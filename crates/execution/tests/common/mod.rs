// Path: crates/execution/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;
use strata_api::state::{CommitStore, KvStore};
use strata_crypto::sign::eddsa::Ed25519KeyPair;
use strata_execution::app::{standard_stack, App};
use strata_execution::Dispatcher;
use strata_services::coin::{balance_key, ACCOUNT_OPTION, MODULE_NAME};
use strata_services::CoinModule;
use strata_state::tree::memory::MemoryStore;
use strata_test_utils::fixtures::{coins, sig_actor, TEST_CHAIN_ID, TEST_DENOM};
use strata_tx::TxRegistry;
use strata_types::app::{Actor, Coin};
use strata_types::codec::from_bytes_canonical;
use strata_types::config::{AppConfig, FeeConfig};
use strata_types::keys::namespaced_key;

pub fn collector() -> Actor {
    Actor::new("fee", b"collector".to_vec())
}

pub fn config(min_fee: u64) -> AppConfig {
    AppConfig {
        chain_id: TEST_CHAIN_ID.to_string(),
        fee: FeeConfig {
            min_fee: coins(min_fee),
            collector: collector(),
        },
        ..Default::default()
    }
}

pub fn account_option(actor: &Actor, amount: u64) -> (String, String) {
    let address: String = actor.address.iter().map(|b| format!("{:02x}", b)).collect();
    let value = format!(
        r#"{{"actor":{{"module":"{}","address":"{}"}},"coins":[{{"denom":"{}","amount":{}}}]}}"#,
        actor.module, address, TEST_DENOM, amount
    );
    (format!("{}/{}", MODULE_NAME, ACCOUNT_OPTION), value)
}

/// A standard application with funded `sigs` accounts, genesis committed
/// and block 1 open.
pub fn coin_app(min_fee: u64, funded: &[(&Ed25519KeyPair, u64)]) -> App<MemoryStore> {
    let cfg = config(min_fee);
    let registry = Arc::new(TxRegistry::new());
    let dispatcher = Dispatcher::new(registry.clone()).with(CoinModule).unwrap();
    let stack = standard_stack(&cfg, dispatcher).unwrap();
    let mut app = App::new(stack, registry, MemoryStore::new(), &cfg).unwrap();

    let options: Vec<_> = funded
        .iter()
        .map(|(key, amount)| account_option(&sig_actor(key), *amount))
        .collect();
    app.init_chain(&[], &options).unwrap();
    app.commit().unwrap();
    app.begin_block(1);
    app
}

/// The deliver-state balance of `actor`.
pub fn balance<S: CommitStore>(app: &App<S>, actor: &Actor) -> u64 {
    let key = namespaced_key(MODULE_NAME, &balance_key(actor, TEST_DENOM));
    match app.store().get(&key).unwrap() {
        Some(bytes) => from_bytes_canonical::<Coin>(&bytes).unwrap().amount,
        None => 0,
    }
}
