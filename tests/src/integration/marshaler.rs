//! # Stored Task Round Trip
//!
//! Tasks go through the scheduler's own storage, not just the codec.

use std::sync::Arc;

use cc_01_kv_store::MemStore;
use cc_07_cron::{Scheduler, TaskMarshaler, TaskScheduler};
use cc_08_custom::{CreateStateMsg, DeleteTimedStateMsg, InnerState};
use node_runtime::CronTaskMarshaler;
use proptest::prelude::*;
use shared_types::{Address, Condition, ErrorKind, Metadata, UnixTime};

fn arb_condition() -> impl Strategy<Value = Condition> {
    ("[a-z]{1,8}", "[a-z_]{1,12}", proptest::collection::vec(any::<u8>(), 0..40))
        .prop_map(|(ext, typ, data)| Condition::new(ext, typ, data))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_scheduled_task_round_trips(
        auth in proptest::collection::vec(arb_condition(), 0..4),
        id in proptest::collection::vec(any::<u8>(), 0..16),
        schema in 1u32..4,
        run_at in 1i64..i64::MAX / 2,
    ) {
        let scheduler = TaskScheduler::new(Arc::new(CronTaskMarshaler));
        let mut store = MemStore::new();
        let msg = DeleteTimedStateMsg { metadata: Metadata::new(schema), timed_state_id: id };
        scheduler.schedule(&mut store, UnixTime::from_seconds(run_at), &auth, &msg).unwrap();

        let due = scheduler.due(&store, UnixTime::from_seconds(run_at), 1).unwrap();
        prop_assert_eq!(due.len(), 1);
        let (got_auth, got) = CronTaskMarshaler.unmarshal_task(&due[0].1).unwrap();
        prop_assert_eq!(got_auth, auth);
        prop_assert_eq!((*got).as_any().downcast_ref::<DeleteTimedStateMsg>(), Some(&msg));
    }
}

#[test]
fn test_unsupported_message_never_stored() {
    let scheduler = TaskScheduler::new(Arc::new(CronTaskMarshaler));
    let mut store = MemStore::new();
    let msg = CreateStateMsg {
        metadata: Metadata::new(1),
        inner_state: InnerState::default(),
        address: Address::new(vec![1; 20]),
    };
    let err = scheduler
        .schedule(&mut store, UnixTime::from_seconds(5), &[], &msg)
        .unwrap_err();
    assert!(err.is(ErrorKind::Type));
    assert!(store.is_empty());
}
