// Path: crates/execution/tests/scenarios.rs
//! End-to-end runs of the standard stack through the application driver.

mod common;

use common::{balance, coin_app, collector};
use parity_scale_codec::{Decode, Encode};
use std::sync::Arc;
use strata_api::state::{KvStore, ScopedStore};
use strata_execution::app::App;
use strata_execution::middleware::{Checkpoint, Recovery};
use strata_execution::{Dispatcher, StackBuilder};
use strata_state::tree::memory::MemoryStore;
use strata_test_utils::assert_code;
use strata_test_utils::fixtures::{coins, keypair, send, sig_actor, TxBuilder, TEST_CHAIN_ID};
use strata_test_utils::handlers::{PanicHandler, ProbeHandler, BEFORE_FAULT_KEY, DELIVERED_KEY};
use strata_tx::{TxPayload, TxRegistry};
use strata_types::app::Tx;
use strata_types::config::AppConfig;
use strata_types::error::ErrorKind;
use strata_types::keys::namespaced_key;

fn transfer(sequence: u32, chain_id: &str) -> Tx {
    let (a, b) = (keypair(1), keypair(2));
    let from = sig_actor(&a);
    TxBuilder::new(send(&from, &sig_actor(&b), 400))
        .fee(coins(2), &from)
        .nonce(sequence, &[from.clone()])
        .chain(chain_id)
        .sign(&a)
        .unwrap()
}

#[test]
fn s1_signed_transfer_pays_fee_and_moves_funds() {
    let a = keypair(1);
    let mut app = coin_app(2, &[(&a, 1000)]);

    let check = app.check_tx(&transfer(1, TEST_CHAIN_ID).to_wire());
    assert!(check.is_ok(), "{:?}", check);
    assert!(check.gas_payment >= 2);

    let res = app.deliver_tx(&transfer(1, TEST_CHAIN_ID).to_wire());
    assert!(res.is_ok(), "{:?}", res);
    assert_eq!(balance(&app, &sig_actor(&a)), 598);
    assert_eq!(balance(&app, &sig_actor(&keypair(2))), 400);
    assert_eq!(balance(&app, &collector()), 2);

    let commit = app.commit().unwrap();
    assert_eq!(commit.height, 1);
}

#[test]
fn s2_out_of_order_sequence_changes_nothing() {
    let a = keypair(1);
    let mut app = coin_app(2, &[(&a, 1000)]);
    let res = app.deliver_tx(&transfer(2, TEST_CHAIN_ID).to_wire());
    assert_code!(res, ErrorKind::BadNonce);
    assert!(res.log.contains("Expected: 1, Got: 2"), "{}", res.log);
    assert_eq!(balance(&app, &sig_actor(&a)), 1000);
    assert_eq!(balance(&app, &collector()), 0);
}

#[test]
fn s3_foreign_chain_is_rejected() {
    let a = keypair(1);
    let mut app = coin_app(2, &[(&a, 1000)]);
    let res = app.deliver_tx(&transfer(1, "other").to_wire());
    assert_code!(res, ErrorKind::WrongChain);
    assert!(res.log.contains("'other'"), "{}", res.log);
    assert_eq!(balance(&app, &sig_actor(&a)), 1000);
}

#[test]
fn s4_corrupted_multisig_is_invalid() {
    let (a, b) = (keypair(1), keypair(2));
    let (alice, bob) = (sig_actor(&a), sig_actor(&b));
    let mut app = coin_app(0, &[(&a, 1000), (&b, 1000)]);

    let signed = TxBuilder::new(send(&alice, &bob, 10))
        .nonce(1, &[alice.clone(), bob.clone()])
        .chain(TEST_CHAIN_ID)
        .sign_all(&[&a, &b])
        .unwrap();
    let Tx::MultiSig(mut multi) = signed.clone() else {
        panic!("expected a multi-signature wrapper")
    };
    multi.signed[1].signature[0] ^= 0xff;

    let res = app.deliver_tx(&Tx::MultiSig(multi).to_wire());
    assert_code!(res, ErrorKind::InvalidSignature);
    assert_eq!(balance(&app, &alice), 1000);

    let res = app.deliver_tx(&signed.to_wire());
    assert!(res.is_ok(), "{:?}", res);
    assert_eq!(balance(&app, &bob), 1010);
}

#[test]
fn s5_recovered_panic_leaves_no_writes() {
    let registry = Arc::new(TxRegistry::new());
    let dispatcher = Dispatcher::new(registry.clone())
        .with(PanicHandler::new("coin", "boom"))
        .unwrap();
    let stack = StackBuilder::new()
        .middleware(Recovery)
        .middleware(Checkpoint {
            on_check: false,
            on_deliver: true,
        })
        .build(dispatcher)
        .unwrap();
    let mut app = App::new(stack, registry, MemoryStore::new(), &AppConfig::default()).unwrap();

    let tx = send(&sig_actor(&keypair(1)), &sig_actor(&keypair(2)), 1);
    let res = app.deliver_tx(&tx.to_wire());
    assert_code!(res, ErrorKind::Internal);
    assert!(res.log.contains("boom"), "{}", res.log);
    assert_eq!(
        app.store()
            .get(&namespaced_key("coin", BEFORE_FAULT_KEY))
            .unwrap(),
        None
    );
    assert!(!app.store().is_dirty());
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct FooTx(u32);

impl TxPayload for FooTx {
    const TAG: u8 = 0x20;
    const NAME: &'static str = "foo/write";
    const MODULE: &'static str = "foo";
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct BarTx(u32);

impl TxPayload for BarTx {
    const TAG: u8 = 0x21;
    const NAME: &'static str = "bar/write";
    const MODULE: &'static str = "bar";
}

#[test]
fn s6_modules_sharing_a_store_never_collide() {
    let registry = Arc::new(
        TxRegistry::new()
            .with::<FooTx>()
            .unwrap()
            .with::<BarTx>()
            .unwrap(),
    );
    let dispatcher = Dispatcher::new(registry.clone())
        .with(ProbeHandler::new("foo"))
        .unwrap()
        .with(ProbeHandler::new("bar"))
        .unwrap();
    let stack = StackBuilder::new().middleware(Recovery).build(dispatcher).unwrap();
    let mut app = App::new(stack, registry, MemoryStore::new(), &AppConfig::default()).unwrap();

    app.init_chain(&[], &[("foo/only_foo".into(), "1".into())])
        .unwrap();
    let foo = FooTx(1).to_tx();
    let bar = BarTx(2).to_tx();
    assert!(app.deliver_tx(&foo.to_wire()).is_ok());
    assert!(app.deliver_tx(&bar.to_wire()).is_ok());

    let mut store = MemoryStore::new();
    for (k, v) in app.store().iter() {
        store.insert(k, v).unwrap();
    }
    let mut root = ScopedStore::new(&mut store);
    {
        let foo_scope = root.namespace("foo").unwrap();
        assert_eq!(foo_scope.get(DELIVERED_KEY).unwrap(), Some(foo.to_wire()));
        assert_eq!(foo_scope.get(b"only_foo").unwrap(), Some(b"1".to_vec()));
    }
    let bar_scope = root.namespace("bar").unwrap();
    assert_eq!(bar_scope.get(DELIVERED_KEY).unwrap(), Some(bar.to_wire()));
    assert_eq!(bar_scope.get(b"only_foo").unwrap(), None);
}

#[test]
fn check_cache_queues_sequences_until_commit() {
    let a = keypair(1);
    let mut app = coin_app(2, &[(&a, 1000)]);
    assert!(app.check_tx(&transfer(1, TEST_CHAIN_ID).to_wire()).is_ok());
    // The cache remembers the first check, so the next sequence is 2.
    let replay = app.check_tx(&transfer(1, TEST_CHAIN_ID).to_wire());
    assert_code!(replay, ErrorKind::BadNonce);
    assert!(app.check_tx(&transfer(2, TEST_CHAIN_ID).to_wire()).is_ok());

    // Nothing was delivered, so the committed sequence is still zero.
    app.commit().unwrap();
    assert!(app.check_tx(&transfer(1, TEST_CHAIN_ID).to_wire()).is_ok());
}

#[test]
fn validator_updates_are_reported_at_end_block() {
    let a = keypair(1);
    let mut app = coin_app(0, &[(&a, 1000)]);
    assert!(app.end_block().is_empty());
    let info = app.info();
    assert_eq!(info.chain_id, TEST_CHAIN_ID);
    assert_eq!(info.last_height, 0);
}

#[test]
fn check_charges_fee_and_amount_against_one_balance() {
    let (a, b) = (keypair(1), keypair(2));
    let alice = sig_actor(&a);
    let mut app = coin_app(2, &[(&a, 5)]);
    let spend = |sequence: u32, amount: u64| {
        TxBuilder::new(send(&alice, &sig_actor(&b), amount))
            .fee(coins(2), &alice)
            .nonce(sequence, &[alice.clone()])
            .chain(TEST_CHAIN_ID)
            .sign(&a)
            .unwrap()
            .to_wire()
    };

    // Fee 2 plus amount 5 exceeds a balance of 5 in either phase.
    assert_code!(app.check_tx(&spend(1, 5)), ErrorKind::InsufficientFunds);
    assert_code!(app.deliver_tx(&spend(1, 5)), ErrorKind::InsufficientFunds);
    assert_eq!(balance(&app, &alice), 5);

    // The cache carries the first spend, so the second cannot pay its fee.
    assert!(app.check_tx(&spend(1, 1)).is_ok());
    assert_code!(app.check_tx(&spend(2, 1)), ErrorKind::InsufficientFunds);
}

#[test]
fn restart_resumes_from_the_committed_height() {
    let a = keypair(1);
    let mut app = coin_app(0, &[(&a, 1000)]);
    assert_eq!(app.commit().unwrap().height, 1);
    // A commit without begin_block advances by one.
    assert_eq!(app.commit().unwrap().height, 2);

    let cfg = common::config(0);
    let registry = Arc::new(TxRegistry::new());
    let dispatcher = Dispatcher::new(registry.clone())
        .with(strata_services::CoinModule)
        .unwrap();
    let stack = strata_execution::app::standard_stack(&cfg, dispatcher).unwrap();
    let restarted = App::new(stack, registry, app.store().clone(), &cfg).unwrap();
    assert_eq!(restarted.info().last_height, app.info().last_height);
    assert_eq!(restarted.info().last_app_hash, app.info().last_app_hash);
}
