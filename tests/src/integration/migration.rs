//! # Schema Migration
//!
//! Records are upgraded on every read; records already at the latest
//! schema come back untouched, records from the future are refused.

use std::sync::Arc;

use cc_01_kv_store::MemStore;
use cc_02_orm::MigrationRegistry;
use cc_08_custom::{register_migrations, timed_state_bucket, InnerStateEnum, TimedState, PACKAGE};
use node_runtime::container::build_registry;
use node_runtime::TxSum;
use proptest::prelude::*;
use shared_types::{ErrorKind, Metadata, UnixTime};

use super::fixtures::*;

fn record(schema: u32, suffix: &str, delete_at: i64) -> TimedState {
    TimedState {
        metadata: Metadata::new(schema),
        inner_state_enum: InnerStateEnum::CaseTwo,
        str: format!("cstm{suffix}"),
        byte: suffix.as_bytes().to_vec(),
        delete_at: UnixTime::from_seconds(delete_at),
        delete_task_id: vec![],
    }
}

/// The node's registry plus a second `TimedState` step that tags `str`.
fn upgraded_registry() -> Arc<MigrationRegistry> {
    let mut reg = MigrationRegistry::new();
    register_migrations(&mut reg).unwrap();
    reg.register::<TimedState, _>(PACKAGE, 2, |t: &mut TimedState| {
        t.str.push_str("-v2");
        Ok(())
    })
    .unwrap();
    reg.verify().unwrap();
    Arc::new(reg)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_current_records_read_back_unchanged(
        suffix in "[a-z0-9]{0,12}",
        delete_at in 0i64..4_000_000_000,
    ) {
        let bucket = timed_state_bucket(build_registry().unwrap()).unwrap();
        let mut store = MemStore::new();
        let stored = record(1, &suffix, delete_at);
        let id = bucket.put(&mut store, &[], &stored).unwrap();

        let first = bucket.one(&store, &id).unwrap();
        let second = bucket.one(&store, &id).unwrap();
        prop_assert_eq!(&first, &stored);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_old_record_upgraded_on_read() {
    let mut store = MemStore::new();
    let old = timed_state_bucket(build_registry().unwrap()).unwrap();
    let id = old.put(&mut store, &[], &record(1, "-old", 0)).unwrap();

    let new = timed_state_bucket(upgraded_registry()).unwrap();
    let got = new.one(&store, &id).unwrap();
    assert_eq!(got.metadata.schema, 2);
    assert_eq!(got.str, "cstm-old-v2");

    // reads never write back
    assert_eq!(old.one(&store, &id).unwrap().metadata.schema, 1);
}

#[test]
fn test_future_record_refused() {
    let mut store = MemStore::new();
    let new = timed_state_bucket(upgraded_registry()).unwrap();
    let id = new.put(&mut store, &[], &record(2, "-new", 0)).unwrap();

    let old = timed_state_bucket(build_registry().unwrap()).unwrap();
    let err = old.one(&store, &id).unwrap_err();
    assert!(err.is(ErrorKind::Metadata));
    assert!(err.to_string().contains("unsupported schema version 2"), "{err}");
    assert!(old.all(&store).unwrap_err().is(ErrorKind::Metadata));
}

#[test]
fn test_future_message_schema_rejected() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let mut msg = timed(at(100));
    msg.metadata = Metadata::new(2);
    let res = app.deliver_tx(&unsigned(TxSum::CreateTimedState(msg)));
    assert_eq!(res.code, ErrorKind::Metadata.code());
    app.commit().unwrap();
    assert_eq!(count(&app, "/timedstates"), 0);
}

#[test]
fn test_missing_schema_reported_with_other_fields() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let mut msg = timed(at(100));
    msg.metadata = Metadata::default();
    msg.str = String::new();
    let res = app.deliver_tx(&unsigned(TxSum::CreateTimedState(msg)));
    assert_eq!(res.code, ErrorKind::Metadata.code());
    assert!(res.log.contains("Metadata") && res.log.contains("Str"), "{}", res.log);
}
