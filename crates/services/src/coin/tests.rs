use super::*;
use strata_state::tree::memory::MemoryStore;
use strata_test_utils::assert_err_kind;
use strata_test_utils::fixtures::{coins, keypair, send, sig_actor, TEST_CHAIN_ID};
use strata_types::error::ErrorKind;

fn ctx_for(actors: &[Actor]) -> Context {
    Context::new(TEST_CHAIN_ID, 1, Span::none()).with_permissions(actors.iter().cloned())
}

fn fund(store: &mut ScopedStore<'_>, actor: &Actor, amount: u64) {
    let json = format!(
        r#"{{"actor":{{"module":"{}","address":"{}"}},"coins":[{{"denom":"mycoin","amount":{}}}]}}"#,
        actor.module,
        hex_address(actor),
        amount
    );
    CoinModule
        .init_state(&Span::none(), store, MODULE_NAME, ACCOUNT_OPTION, &json)
        .unwrap();
}

fn hex_address(actor: &Actor) -> String {
    actor.address.iter().map(|b| format!("{:02x}", b)).collect()
}

#[test]
fn deliver_moves_funds() {
    let (a, b) = (sig_actor(&keypair(1)), sig_actor(&keypair(2)));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    fund(&mut store, &a, 1000);

    CoinModule
        .deliver_tx(&ctx_for(&[a.clone()]), &mut store, &send(&a, &b, 400))
        .unwrap();
    assert_eq!(balance(&store, &a, "mycoin").unwrap(), coins(600));
    assert_eq!(balance(&store, &b, "mycoin").unwrap(), coins(400));
}

#[test]
fn check_debits_so_later_checks_see_the_spend() {
    let (a, b) = (sig_actor(&keypair(1)), sig_actor(&keypair(2)));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    fund(&mut store, &a, 5);

    let ctx = ctx_for(&[a.clone()]);
    CoinModule.check_tx(&ctx, &mut store, &send(&a, &b, 2)).unwrap();
    assert_eq!(balance(&store, &a, "mycoin").unwrap(), coins(3));
    assert_eq!(balance(&store, &b, "mycoin").unwrap(), coins(2));
    assert_err_kind!(
        CoinModule.check_tx(&ctx, &mut store, &send(&a, &b, 5)),
        ErrorKind::InsufficientFunds
    );
}

#[test]
fn sender_must_be_authorized() {
    let (a, b) = (sig_actor(&keypair(1)), sig_actor(&keypair(2)));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    fund(&mut store, &a, 10);
    assert_err_kind!(
        CoinModule.check_tx(&ctx_for(&[b.clone()]), &mut store, &send(&a, &b, 1)),
        ErrorKind::Unauthorized
    );
}

#[test]
fn overdraft_is_insufficient_funds_and_writes_nothing() {
    let (a, b) = (sig_actor(&keypair(1)), sig_actor(&keypair(2)));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    fund(&mut store, &a, 5);
    assert_err_kind!(
        CoinModule.deliver_tx(&ctx_for(&[a.clone()]), &mut store, &send(&a, &b, 6)),
        ErrorKind::InsufficientFunds
    );
    assert_eq!(balance(&store, &a, "mycoin").unwrap(), coins(5));
    assert!(balance(&store, &b, "mycoin").unwrap().is_zero());
}

#[test]
fn self_transfer_keeps_balance() {
    let a = sig_actor(&keypair(1));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    fund(&mut store, &a, 7);
    CoinModule
        .deliver_tx(&ctx_for(&[a.clone()]), &mut store, &send(&a, &a, 7))
        .unwrap();
    assert_eq!(balance(&store, &a, "mycoin").unwrap(), coins(7));
}

#[test]
fn genesis_rejects_unknown_options_and_bad_json() {
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    assert_err_kind!(
        CoinModule.init_state(&Span::none(), &mut store, MODULE_NAME, "supply", "{}"),
        ErrorKind::InvalidFormat
    );
    assert_err_kind!(
        CoinModule.init_state(&Span::none(), &mut store, MODULE_NAME, ACCOUNT_OPTION, "not json"),
        ErrorKind::InvalidFormat
    );
}

#[test]
fn foreign_payloads_are_unknown() {
    let a = sig_actor(&keypair(1));
    let mut backing = MemoryStore::new();
    let mut store = ScopedStore::new(&mut backing);
    let wrapped = send(&a, &a, 1).bind_chain(TEST_CHAIN_ID, 0);
    assert_err_kind!(
        CoinModule.check_tx(&ctx_for(&[a]), &mut store, &wrapped),
        ErrorKind::UnknownTxType
    );
}
