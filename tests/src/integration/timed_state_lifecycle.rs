//! # Timed State Lifecycle
//!
//! ```text
//! CreateTimedState(delete_at = now + 1h) ─→ record + pending task
//!        │
//!   block at now + 2h ─→ tick ─→ DeleteTimedState (cron stack) ─→ record gone
//!        │
//!   next block ─→ nothing left to pop
//! ```

use cc_07_cron::TaskResult;
use cc_08_custom::{State, TimedState};
use node_runtime::TxSum;
use shared_types::{Address, Metadata};

use super::fixtures::*;

#[test]
fn test_timed_record_deleted_after_deadline() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let res = app.deliver_tx(&unsigned(TxSum::CreateTimedState(timed(at(3600)))));
    assert!(res.is_ok(), "{}", res.log);
    let id = res.data;
    app.commit().unwrap();

    let record: TimedState = fetch(&app, "/timedstates", &id).expect("record exists");
    assert_eq!(record.delete_at, at(3600));
    assert_eq!(record.delete_task_id.len(), 16);

    let report = app.begin_block(2, at(7200)).unwrap();
    assert_eq!((report.executed, report.failed), (1, 0));
    app.commit().unwrap();
    assert!(fetch::<TimedState>(&app, "/timedstates", &id).is_none());

    let result: TaskResult =
        fetch(&app, "/cronres", &record.delete_task_id).expect("result stored");
    assert!(result.successful, "{}", result.info);
    assert_eq!(result.exec_time, at(7200));
    assert_eq!(result.exec_height, 2);

    let report = app.begin_block(3, at(7201)).unwrap();
    assert_eq!(report.executed, 0);
}

#[test]
fn test_record_survives_until_deadline() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let id = app
        .deliver_tx(&unsigned(TxSum::CreateTimedState(timed(at(100)))))
        .data;
    app.commit().unwrap();

    assert_eq!(app.begin_block(2, at(99)).unwrap().executed, 0);
    app.commit().unwrap();
    assert!(fetch::<TimedState>(&app, "/timedstates", &id).is_some());

    // A deadline equal to the block time is due.
    assert_eq!(app.begin_block(3, at(100)).unwrap().executed, 1);
    app.commit().unwrap();
    assert!(fetch::<TimedState>(&app, "/timedstates", &id).is_none());
}

#[test]
fn test_zero_deadline_never_scheduled() {
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let id = app
        .deliver_tx(&unsigned(TxSum::CreateTimedState(timed(shared_types::UnixTime::ZERO))))
        .data;
    app.commit().unwrap();

    let record: TimedState = fetch(&app, "/timedstates", &id).unwrap();
    assert!(record.delete_task_id.is_empty());
    assert_eq!(app.begin_block(2, at(1_000_000)).unwrap().executed, 0);
}

#[test]
fn test_created_records_match_input() {
    let mut app = app();
    app.begin_block(1, at(42)).unwrap();
    let msg = create_state(Address::new(vec![3; 20]));
    let state_id = app.deliver_tx(&unsigned(TxSum::CreateState(msg.clone()))).data;
    let timed_msg = timed(at(500));
    let timed_id = app
        .deliver_tx(&unsigned(TxSum::CreateTimedState(timed_msg.clone())))
        .data;
    app.commit().unwrap();

    let state: State = fetch(&app, "/states", &state_id).unwrap();
    assert_eq!(
        state,
        State {
            metadata: Metadata::new(1),
            inner_state: msg.inner_state,
            address: msg.address,
            created_at: at(42),
        }
    );

    let record: TimedState = fetch(&app, "/timedstates", &timed_id).unwrap();
    assert_eq!(record.inner_state_enum, timed_msg.inner_state_enum);
    assert_eq!(record.str, timed_msg.str);
    assert_eq!(record.byte, timed_msg.byte);
    assert_eq!(record.delete_at, timed_msg.delete_at);
}

#[test]
fn test_empty_envelope_is_type_error() {
    use node_runtime::Tx;
    let mut app = app();
    app.begin_block(1, at(1)).unwrap();
    let res = app.deliver_tx(&Tx::default().encode().unwrap());
    assert_eq!(res.code, shared_types::ErrorKind::Type.code());
}

#[test]
fn test_user_stack_has_no_delete_route() {
    use cc_01_kv_store::MemStore;
    use cc_03_pipeline::{Context, Handler, MsgTx};
    use cc_07_cron::TickerConfig;
    use cc_08_custom::DeleteTimedStateMsg;
    use node_runtime::{GenesisConfig, Stacks};
    use shared_types::{sequence_id, ErrorKind};

    let stacks = Stacks::build(TickerConfig::default()).unwrap();
    let mut store = MemStore::new();
    GenesisConfig::dev(CHAIN).apply(CHAIN, &mut store, &stacks).unwrap();

    let tx = MsgTx::new(DeleteTimedStateMsg {
        metadata: Metadata::new(1),
        timed_state_id: sequence_id(1),
    });
    let ctx = Context::new(CHAIN).with_block_time(at(1));
    let err = stacks.user.deliver(&ctx, &mut store, &tx).unwrap_err();
    assert!(err.is(ErrorKind::Type));
}
