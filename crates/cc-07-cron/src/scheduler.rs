use std::sync::Arc;

use cc_01_kv_store::{prefix_end, KvStore};
use cc_02_orm::Sequence;
use cc_03_pipeline::Msg;
use shared_types::{ChainError, ChainResult, Condition, UnixTime};
use tracing::debug;

use crate::marshaler::TaskMarshaler;

const TASK_PREFIX: &[u8] = b"_crontask:";

/// `run_at` (8 bytes) followed by the insertion sequence (8 bytes).
pub const TASK_ID_LENGTH: usize = 16;

/// Registers deferred work. Handlers hold this as a trait object so the
/// storage layout stays private to this crate.
pub trait Scheduler: Send + Sync {
    /// Store `msg` to run with `auth` once block time reaches `run_at`.
    /// Returns the task id.
    fn schedule(
        &self,
        store: &mut dyn KvStore,
        run_at: UnixTime,
        auth: &[Condition],
        msg: &dyn Msg,
    ) -> ChainResult<Vec<u8>>;

    /// Cancel a pending task.
    fn delete(&self, store: &mut dyn KvStore, task_id: &[u8]) -> ChainResult<()>;
}

pub struct TaskScheduler {
    marshaler: Arc<dyn TaskMarshaler>,
    sequence: Sequence,
}

impl TaskScheduler {
    pub fn new(marshaler: Arc<dyn TaskMarshaler>) -> Self {
        Self {
            marshaler,
            sequence: Sequence::new("crontask", "seq"),
        }
    }

    pub fn marshaler(&self) -> &dyn TaskMarshaler {
        &*self.marshaler
    }

    /// Up to `limit` tasks with `run_at <= now`, oldest deadline first.
    pub fn due(
        &self,
        store: &dyn KvStore,
        now: UnixTime,
        limit: usize,
    ) -> ChainResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let end = match deadline_bytes(now).checked_add(1) {
            Some(after) => task_key(&after.to_be_bytes()),
            None => prefix_end(TASK_PREFIX).unwrap_or_default(),
        };
        Ok(store
            .range(TASK_PREFIX, Some(&end), Some(limit))?
            .into_iter()
            .map(|(key, raw)| (key[TASK_PREFIX.len()..].to_vec(), raw))
            .collect())
    }

    /// Drop a task that is about to run.
    pub fn remove(&self, store: &mut dyn KvStore, task_id: &[u8]) -> ChainResult<()> {
        store.delete(&task_key(task_id))
    }
}

impl Scheduler for TaskScheduler {
    fn schedule(
        &self,
        store: &mut dyn KvStore,
        run_at: UnixTime,
        auth: &[Condition],
        msg: &dyn Msg,
    ) -> ChainResult<Vec<u8>> {
        if run_at.is_zero() {
            return Err(ChainError::empty("task run time required"));
        }
        let raw = self.marshaler.marshal_task(auth, msg)?;

        let mut task_id = Vec::with_capacity(TASK_ID_LENGTH);
        task_id.extend_from_slice(&deadline_bytes(run_at).to_be_bytes());
        task_id.extend_from_slice(&self.sequence.next_id(store)?);
        store.set(task_key(&task_id), raw)?;

        debug!(
            task_id = %hex::encode(&task_id),
            path = msg.path(),
            run_at = %run_at,
            "task scheduled"
        );
        Ok(task_id)
    }

    fn delete(&self, store: &mut dyn KvStore, task_id: &[u8]) -> ChainResult<()> {
        if task_id.len() != TASK_ID_LENGTH {
            return Err(ChainError::input(format!("task id must be {TASK_ID_LENGTH} bytes")));
        }
        let key = task_key(task_id);
        if !store.has(&key)? {
            return Err(ChainError::not_found(format!("task {}", hex::encode(task_id))));
        }
        store.delete(&key)?;
        debug!(task_id = %hex::encode(task_id), "task cancelled");
        Ok(())
    }
}

/// Times before the epoch sort first.
fn deadline_bytes(time: UnixTime) -> u64 {
    time.seconds().max(0) as u64
}

fn task_key(task_id: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(TASK_PREFIX.len() + task_id.len());
    key.extend_from_slice(TASK_PREFIX);
    key.extend_from_slice(task_id);
    key
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use cc_01_kv_store::MemStore;
    use shared_types::ErrorKind;

    fn remove(key: &[u8]) -> Remove {
        Remove { key: key.to_vec() }
    }

    #[test]
    fn test_due_respects_deadline() {
        let s = scheduler();
        let mut store = MemStore::new();
        let auth = vec![Condition::new("test", "owner", vec![1])];
        let id = s
            .schedule(&mut store, UnixTime::from_seconds(100), &auth, &remove(b"k"))
            .unwrap();

        assert!(s.due(&store, UnixTime::from_seconds(99), 10).unwrap().is_empty());
        let due = s.due(&store, UnixTime::from_seconds(100), 10).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, id);

        let (got_auth, msg) = s.marshaler().unmarshal_task(&due[0].1).unwrap();
        assert_eq!(got_auth, auth);
        assert_eq!((*msg).as_any().downcast_ref::<Remove>(), Some(&remove(b"k")));
    }

    #[test]
    fn test_due_order_by_deadline_then_insertion() {
        let s = scheduler();
        let mut store = MemStore::new();
        let late = s
            .schedule(&mut store, UnixTime::from_seconds(50), &[], &remove(b"a"))
            .unwrap();
        let first = s
            .schedule(&mut store, UnixTime::from_seconds(10), &[], &remove(b"b"))
            .unwrap();
        let second = s
            .schedule(&mut store, UnixTime::from_seconds(10), &[], &remove(b"c"))
            .unwrap();

        let ids: Vec<_> = s
            .due(&store, UnixTime::from_seconds(60), 10)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![first.clone(), second, late]);
        assert_eq!(s.due(&store, UnixTime::from_seconds(60), 1).unwrap()[0].0, first);
    }

    #[test]
    fn test_unsupported_message_rejected_at_schedule() {
        let s = scheduler();
        let mut store = MemStore::new();
        let err = s
            .schedule(&mut store, UnixTime::from_seconds(1), &[], &Unsupported)
            .unwrap_err();
        assert!(err.is(ErrorKind::Type));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_pending_task() {
        let s = scheduler();
        let mut store = MemStore::new();
        let id = s
            .schedule(&mut store, UnixTime::from_seconds(5), &[], &remove(b"k"))
            .unwrap();
        assert_eq!(id.len(), TASK_ID_LENGTH);
        s.delete(&mut store, &id).unwrap();
        assert!(s.due(&store, UnixTime::from_seconds(5), 10).unwrap().is_empty());
        assert!(s.delete(&mut store, &id).unwrap_err().is(ErrorKind::NotFound));
        assert!(s.delete(&mut store, &[1, 2]).unwrap_err().is(ErrorKind::Input));
    }

    #[test]
    fn test_zero_run_at_rejected() {
        let s = scheduler();
        let mut store = MemStore::new();
        let err = s
            .schedule(&mut store, UnixTime::ZERO, &[], &remove(b"k"))
            .unwrap_err();
        assert!(err.is(ErrorKind::Empty));
    }
}
