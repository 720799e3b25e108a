//! # Batch Atomicity
//!
//! A batch either applies every inner message or none of them.

use cc_06_batch::decode_results;
use cc_08_custom::{State, TimedState};
use node_runtime::{BatchSum, BatchUnion, ExecuteBatchMsg, TxSum};
use proptest::prelude::*;
use shared_types::codec::encode;
use shared_types::{Address, ErrorKind};

use super::fixtures::*;

fn valid(i: usize) -> BatchSum {
    if i % 2 == 0 {
        BatchSum::CreateState(create_state(Address::new(vec![i as u8 + 1; 20])))
    } else {
        BatchSum::CreateTimedState(timed(at(1_000)))
    }
}

fn invalid() -> BatchSum {
    BatchSum::CreateState(create_state(Address::new(vec![1; 3])))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_failing_message_discards_earlier_ones(n in 1usize..=10, k in 0usize..10) {
        let k = k % n;
        let messages = (0..n).map(|i| if i == k { invalid() } else { valid(i) });

        let mut app = app();
        app.begin_block(1, at(1)).unwrap();
        let res = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(ExecuteBatchMsg::new(messages))));
        prop_assert_eq!(res.code, ErrorKind::Input.code());
        prop_assert!(res.log.contains(&format!("batch message {k}")), "{}", res.log);
        app.commit().unwrap();

        prop_assert_eq!(count(&app, "/states"), 0);
        prop_assert_eq!(count(&app, "/timedstates"), 0);
        prop_assert_eq!(app.begin_block(2, at(2_000)).unwrap().executed, 0);
    }
}

#[test]
fn test_unsupported_middle_entry_is_type_error() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let mut batch = ExecuteBatchMsg::new([
        BatchSum::CreateState(create_state(Address::new(vec![4; 20]))),
        BatchSum::CashSend(send(Address::new(vec![9; 20]), 5)),
    ]);
    batch.messages.insert(1, Default::default());

    let res = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(batch)));
    assert_eq!(res.code, ErrorKind::Type.code());
    app.commit().unwrap();
    assert_eq!(count(&app, "/states"), 0);
    assert_eq!(balance(&app, &Address::new(vec![9; 20])), 0);
}

/// A slot tagged with a message type this application does not know, sent
/// as raw bytes, is a Type error rather than an undecodable envelope.
#[test]
fn test_unknown_slot_variant_in_raw_bytes_is_type_error() {
    let first = BatchSum::CreateState(create_state(Address::new(vec![4; 20])));
    let mut batch = ExecuteBatchMsg::new([
        first.clone(),
        BatchSum::CashSend(send(Address::new(vec![9; 20]), 5)),
    ]);
    batch.messages.insert(1, BatchUnion::default());
    let mut raw = unsigned(TxSum::ExecuteBatch(batch));

    let first_slot = encode(&BatchUnion::from(first)).unwrap();
    let start = raw
        .windows(first_slot.len())
        .position(|w| w == first_slot.as_slice())
        .unwrap()
        + first_slot.len();
    assert_eq!(raw[start..start + 4], [0, 0, 0, 0]);
    raw[start..start + 4].copy_from_slice(&99u32.to_le_bytes());

    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let res = app.deliver_tx(&raw);
    assert_eq!(res.code, ErrorKind::Type.code(), "{}", res.log);
    assert!(res.log.contains("batch message 1"), "{}", res.log);
    let check = app.check_tx(&raw);
    assert_eq!(check.code, ErrorKind::Type.code(), "{}", check.log);
    app.commit().unwrap();
    assert_eq!(count(&app, "/states"), 0);
    assert_eq!(balance(&app, &Address::new(vec![9; 20])), 0);
}

#[test]
fn test_successful_batch_results_in_order() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let res = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(ExecuteBatchMsg::new(
        (0..4).map(valid),
    ))));
    assert!(res.is_ok(), "{}", res.log);
    assert_eq!(res.gas_used, 400);
    app.commit().unwrap();

    let ids = decode_results(&res.data).unwrap();
    assert_eq!(ids.len(), 4);
    let first: State = fetch(&app, "/states", &ids[0]).unwrap();
    assert_eq!(first.address, Address::new(vec![1; 20]));
    let second: TimedState = fetch(&app, "/timedstates", &ids[1]).unwrap();
    assert_eq!(second.delete_at, at(1_000));
}

#[test]
fn test_batch_size_limits() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();

    let empty = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(ExecuteBatchMsg::new([]))));
    assert_eq!(empty.code, ErrorKind::Empty.code());

    let eleven = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(ExecuteBatchMsg::new(
        (0..11).map(valid),
    ))));
    assert_eq!(eleven.code, ErrorKind::Input.code());

    let ten = app.deliver_tx(&unsigned(TxSum::ExecuteBatch(ExecuteBatchMsg::new(
        (0..10).map(valid),
    ))));
    assert!(ten.is_ok(), "{}", ten.log);
}

#[test]
fn test_batched_send_uses_outer_signature() {
    use node_runtime::Tx;

    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let dest = Address::new(vec![8; 20]);
    let batch = ExecuteBatchMsg::new([
        BatchSum::CashSend(send(dest.clone(), 3)),
        BatchSum::CashSend(send(dest.clone(), 4)),
    ]);
    let res = app.deliver_tx(&signed(Tx::new(TxSum::ExecuteBatch(batch)), 0));
    assert!(res.is_ok(), "{}", res.log);
    app.commit().unwrap();
    assert_eq!(balance(&app, &dest), 7);
}
