//! # Fees And Replay Protection
//!
//! Fees are charged before the message runs and stay charged when it
//! fails; a signature sequence can be used once.

use node_runtime::genesis::{dev_key, DEV_FEE_TICKER};
use node_runtime::{Application, GenesisConfig, Tx, TxSum};
use shared_types::{Address, Coin, ErrorKind, FeeInfo};

use super::fixtures::*;

const MIN_FEE: u64 = 5;

fn collector() -> Address {
    Address::new(vec![0xc0; 20])
}

fn paid_app() -> Application {
    let mut genesis = GenesisConfig::dev(CHAIN);
    genesis.cash.collector = hex::encode(collector().as_bytes());
    genesis.cash.minimal_fee = Coin::new(DEV_FEE_TICKER, MIN_FEE);
    app_with(&genesis)
}

fn with_fee(sum: TxSum, amount: u64) -> Tx {
    Tx::new(sum).with_fees(FeeInfo {
        payer: None,
        fees: Some(Coin::new(DEV_FEE_TICKER, amount)),
    })
}

#[test]
fn test_fee_moves_to_collector() {
    let mut app = paid_app();
    let payer = dev_key().public_key().address();
    let before = balance(&app, &payer);

    app.begin_block(1, at(1)).unwrap();
    let tx = with_fee(TxSum::CreateState(create_state(Address::new(vec![3; 20]))), MIN_FEE);
    let res = app.deliver_tx(&signed(tx, 0));
    assert!(res.is_ok(), "{}", res.log);
    app.commit().unwrap();

    assert_eq!(balance(&app, &collector()), MIN_FEE);
    assert_eq!(balance(&app, &payer), before - MIN_FEE);
    assert_eq!(count(&app, "/states"), 1);
}

#[test]
fn test_fee_kept_when_message_fails() {
    let mut app = paid_app();
    app.begin_block(1, at(1)).unwrap();

    let mut bad = timed(at(100));
    bad.str = "missing-prefix".to_string();
    let res = app.deliver_tx(&signed(with_fee(TxSum::CreateTimedState(bad), MIN_FEE), 0));
    assert_eq!(res.code, ErrorKind::Input.code());
    app.commit().unwrap();

    assert_eq!(balance(&app, &collector()), MIN_FEE);
    assert_eq!(count(&app, "/timedstates"), 0);

    // the failed transaction still consumed its sequence
    app.begin_block(2, at(2)).unwrap();
    let retry = with_fee(TxSum::CreateTimedState(timed(at(100))), MIN_FEE);
    assert_eq!(
        app.deliver_tx(&signed(retry.clone(), 0)).code,
        ErrorKind::Unauthorized.code()
    );
    assert!(app.deliver_tx(&signed(retry, 1)).is_ok());
}

#[test]
fn test_low_or_missing_fee_rejected() {
    let mut app = paid_app();
    app.begin_block(1, at(1)).unwrap();

    let low = with_fee(TxSum::CreateState(create_state(Address::new(vec![3; 20]))), MIN_FEE - 1);
    let res = app.check_tx(&signed(low, 0));
    assert_eq!(res.code, ErrorKind::InsufficientAmount.code());

    let none = Tx::new(TxSum::CreateState(create_state(Address::new(vec![3; 20]))));
    let res = app.deliver_tx(&signed(none, 0));
    assert_eq!(res.code, ErrorKind::InsufficientAmount.code());

    let other_currency = Tx::new(TxSum::CreateState(create_state(Address::new(vec![3; 20]))))
        .with_fees(FeeInfo {
            payer: None,
            fees: Some(Coin::new("XYZ", 100)),
        });
    // the rejected delivery above already consumed sequence 0
    let res = app.deliver_tx(&signed(other_currency, 1));
    assert_eq!(res.code, ErrorKind::InsufficientAmount.code());
    app.commit().unwrap();
    assert_eq!(balance(&app, &collector()), 0);
}

#[test]
fn test_replayed_sequence_rejected() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let raw = signed(Tx::new(TxSum::CashSend(send(Address::new(vec![9; 20]), 10))), 0);
    assert!(app.deliver_tx(&raw).is_ok());
    app.commit().unwrap();

    app.begin_block(2, at(2)).unwrap();
    assert_eq!(app.check_tx(&raw).code, ErrorKind::Unauthorized.code());
    assert_eq!(app.deliver_tx(&raw).code, ErrorKind::Unauthorized.code());
    app.commit().unwrap();
    assert_eq!(balance(&app, &Address::new(vec![9; 20])), 10);
}

#[test]
fn test_signature_bound_to_chain() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let foreign = Tx::new(TxSum::CashSend(send(Address::new(vec![9; 20]), 10)))
        .sign(&dev_key(), "another-chain", 0)
        .unwrap()
        .encode()
        .unwrap();
    assert_eq!(app.deliver_tx(&foreign).code, ErrorKind::Unauthorized.code());
}
