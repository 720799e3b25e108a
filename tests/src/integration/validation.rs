//! # Validation
//!
//! Field errors are aggregated, identical in check and deliver, and
//! identifier lengths are enforced independently of every other field.

use std::sync::Arc;

use cc_01_kv_store::MemStore;
use cc_08_custom::{
    timed_state_bucket, CreateTimedStateMsg, DeleteTimedStateMsg, InnerStateEnum, TimedState,
};
use node_runtime::container::build_registry;
use node_runtime::TxSum;
use proptest::prelude::*;
use shared_types::{ChainError, ErrorKind, Metadata, UnixTime, Validate};

use super::fixtures::*;

fn arb_timed() -> impl Strategy<Value = CreateTimedStateMsg> {
    (
        0u32..=1,
        prop_oneof![
            Just(InnerStateEnum::Invalid),
            Just(InnerStateEnum::CaseOne),
            Just(InnerStateEnum::CaseTwo)
        ],
        prop_oneof![Just(""), Just("cstm"), Just("cstm-ok"), Just("other")],
        prop_oneof![Just(0i64), Just(T0 - 10), Just(T0 + 10)],
    )
        .prop_map(|(schema, inner_state_enum, s, delete_at)| CreateTimedStateMsg {
            metadata: Metadata::new(schema),
            inner_state_enum,
            str: s.to_string(),
            byte: vec![],
            delete_at: UnixTime::from_seconds(delete_at),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_check_and_deliver_agree(msg in arb_timed()) {
        let mut app = app();
        app.begin_block(1, at(0)).unwrap();
        let raw = unsigned(TxSum::CreateTimedState(msg));
        let checked = app.check_tx(&raw);
        let delivered = app.deliver_tx(&raw);
        prop_assert_eq!(checked.code, delivered.code);
        if !checked.is_ok() {
            prop_assert_eq!(checked.log, delivered.log);
        }
    }
}

#[test]
fn test_every_failing_field_reported() {
    let msg = CreateTimedStateMsg {
        metadata: Metadata::default(),
        inner_state_enum: InnerStateEnum::Invalid,
        str: "nope".to_string(),
        byte: vec![],
        delete_at: UnixTime::ZERO,
    };
    match msg.validate().unwrap_err() {
        ChainError::Fields(fields) => {
            assert_eq!(fields.names(), vec!["Metadata", "InnerStateEnum", "Str"]);
        }
        other => panic!("expected field errors, got {other}"),
    }
}

#[test]
fn test_three_byte_id_rejected_by_bucket() {
    let bucket = timed_state_bucket(build_registry().unwrap()).unwrap();
    let mut store = MemStore::new();
    let record = TimedState {
        metadata: Metadata::new(1),
        inner_state_enum: InnerStateEnum::CaseTwo,
        str: "cstm-valid".to_string(),
        byte: vec![],
        delete_at: UnixTime::ZERO,
        delete_task_id: vec![],
    };
    record.validate().unwrap();

    let err = bucket.put(&mut store, &[1, 2, 3], &record).unwrap_err();
    assert!(err.is(ErrorKind::Input));
    assert!(err.to_string().contains("must be 8 bytes"), "{err}");
    assert!(bucket.all(&store).unwrap().is_empty());
}

#[test]
fn test_three_byte_id_rejected_by_delete_msg() {
    let msg = DeleteTimedStateMsg {
        metadata: Metadata::new(1),
        timed_state_id: vec![1, 2, 3],
    };
    let err = msg.validate().unwrap_err();
    let field = err.field_error("TimedStateID").expect("tagged");
    assert!(field.is(ErrorKind::Input));
    assert!(field.to_string().contains("must be 8 bytes"));
}

#[test]
fn test_past_deadline_rejected_at_block_time() {
    let mut app = app();
    app.begin_block(1, at(100)).unwrap();
    let res = app.deliver_tx(&unsigned(TxSum::CreateTimedState(timed(at(99)))));
    assert_eq!(res.code, ErrorKind::Input.code());
    assert!(res.log.contains("DeleteAt"), "{}", res.log);

    let res = app.deliver_tx(&unsigned(TxSum::CreateTimedState(timed(at(100)))));
    assert!(res.is_ok(), "{}", res.log);
}

#[test]
fn test_registry_shared_by_every_bucket() {
    let registry = build_registry().unwrap();
    assert!(timed_state_bucket(Arc::clone(&registry)).is_ok());
    assert!(cc_08_custom::state_bucket(registry).is_ok());
}
