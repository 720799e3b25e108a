//! # Scheduling
//!
//! Due-set boundaries and cancellation against the real task encoding.

use cc_01_kv_store::{KvStore, MemStore};
use cc_07_cron::{Scheduler, TaskScheduler};
use cc_08_custom::{timed_state_condition, DeleteTimedStateMsg};
use node_runtime::CronTaskMarshaler;
use proptest::prelude::*;
use shared_types::{sequence_id, ErrorKind, Metadata, UnixTime};
use std::sync::Arc;

fn scheduler() -> TaskScheduler {
    TaskScheduler::new(Arc::new(CronTaskMarshaler))
}

fn delete(id: u64) -> DeleteTimedStateMsg {
    DeleteTimedStateMsg {
        metadata: Metadata::new(1),
        timed_state_id: sequence_id(id),
    }
}

fn schedule(s: &TaskScheduler, store: &mut MemStore, run_at: i64, id: u64) -> Vec<u8> {
    s.schedule(
        store,
        UnixTime::from_seconds(run_at),
        &[timed_state_condition(&sequence_id(id))],
        &delete(id),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_task_due_exactly_from_deadline(deadline in 1i64..1_000_000, now in 0i64..2_000_000) {
        let s = scheduler();
        let mut store = MemStore::new();
        let task_id = schedule(&s, &mut store, deadline, 1);

        let due = s.due(&store, UnixTime::from_seconds(now), 10).unwrap();
        if now < deadline {
            prop_assert!(due.is_empty());
        } else {
            prop_assert_eq!(due.len(), 1);
            prop_assert_eq!(&due[0].0, &task_id);
            s.remove(&mut store, &task_id).unwrap();
            prop_assert!(s.due(&store, UnixTime::from_seconds(now), 10).unwrap().is_empty());
        }
    }
}

#[test]
fn test_due_in_deadline_then_insertion_order() {
    let s = scheduler();
    let mut store = MemStore::new();
    let late = schedule(&s, &mut store, 300, 1);
    let early_a = schedule(&s, &mut store, 100, 2);
    let early_b = schedule(&s, &mut store, 100, 3);

    let ids: Vec<_> = s
        .due(&store, UnixTime::from_seconds(1_000), 10)
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, vec![early_a, early_b, late]);
}

#[test]
fn test_cancelled_task_never_due() {
    let s = scheduler();
    let mut store = MemStore::new();
    let task_id = schedule(&s, &mut store, 10, 1);
    s.delete(&mut store, &task_id).unwrap();
    assert!(s.due(&store, UnixTime::from_seconds(10), 10).unwrap().is_empty());
    assert!(s.delete(&mut store, &task_id).unwrap_err().is(ErrorKind::NotFound));
}

#[test]
fn test_task_keys_outside_user_buckets() {
    let s = scheduler();
    let mut store = MemStore::new();
    schedule(&s, &mut store, 10, 1);
    assert!(store.prefix_scan(b"timedstates:").unwrap().is_empty());
    assert_eq!(store.prefix_scan(b"_crontask:").unwrap().len(), 1);
}

#[test]
fn test_capped_tick_defers_rest_in_order() {
    use super::fixtures::*;
    use cc_07_cron::TickerConfig;
    use node_runtime::{Application, GenesisConfig, TxSum};

    let mut app = Application::new(CHAIN, TickerConfig { max_tasks_per_tick: 2 }).unwrap();
    app.init_chain(at(0), &GenesisConfig::dev(CHAIN)).unwrap();
    app.begin_block(1, at(1)).unwrap();
    let ids: Vec<_> = (0..5)
        .map(|i| {
            app.deliver_tx(&unsigned(TxSum::CreateTimedState(timed(at(10 + i)))))
                .data
        })
        .collect();
    app.commit().unwrap();

    let first = app.begin_block(2, at(100)).unwrap();
    assert_eq!(first.executed, 2);
    assert!(first.capped);
    app.commit().unwrap();
    assert_eq!(count(&app, "/timedstates"), 3);
    assert!(fetch::<cc_08_custom::TimedState>(&app, "/timedstates", &ids[0]).is_none());
    assert!(fetch::<cc_08_custom::TimedState>(&app, "/timedstates", &ids[2]).is_some());

    assert!(app.begin_block(3, at(101)).unwrap().capped);
    app.commit().unwrap();
    let last = app.begin_block(4, at(102)).unwrap();
    assert_eq!(last.executed, 1);
    assert!(!last.capped);
    app.commit().unwrap();
    assert_eq!(count(&app, "/timedstates"), 0);
}
