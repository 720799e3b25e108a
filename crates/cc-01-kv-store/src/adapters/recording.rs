use std::collections::BTreeMap;

use shared_types::ChainResult;

use crate::domain::{KeyOp, Pair};
use crate::ports::KvStore;

/// Pass-through store that remembers which keys were written.
///
/// Only successful writes are recorded; the last operation on a key wins.
pub struct RecordingStore<'a, S: KvStore + ?Sized> {
    inner: &'a mut S,
    touched: BTreeMap<Vec<u8>, KeyOp>,
}

impl<'a, S: KvStore + ?Sized> RecordingStore<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            touched: BTreeMap::new(),
        }
    }

    /// Touched keys in key order.
    pub fn touched(&self) -> impl Iterator<Item = (&[u8], KeyOp)> {
        self.touched.iter().map(|(k, op)| (k.as_slice(), *op))
    }

    pub fn into_touched(self) -> BTreeMap<Vec<u8>, KeyOp> {
        self.touched
    }
}

impl<S: KvStore + ?Sized> KvStore for RecordingStore<'_, S> {
    fn get(&self, key: &[u8]) -> ChainResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> ChainResult<()> {
        self.inner.set(key.clone(), value)?;
        self.touched.insert(key, KeyOp::Set);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> ChainResult<()> {
        self.inner.delete(key)?;
        self.touched.insert(key.to_vec(), KeyOp::Delete);
        Ok(())
    }

    fn range(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        limit: Option<usize>,
    ) -> ChainResult<Vec<Pair>> {
        self.inner.range(start, end, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemStore;

    #[test]
    fn test_records_sets_and_deletes() {
        let mut store = MemStore::new();
        store.set(b"old".to_vec(), vec![1]).unwrap();

        let mut rec = RecordingStore::new(&mut store);
        rec.set(b"new".to_vec(), vec![2]).unwrap();
        rec.delete(b"old").unwrap();
        let _ = rec.get(b"new").unwrap();

        let touched: Vec<_> = rec.touched().map(|(k, op)| (k.to_vec(), op)).collect();
        assert_eq!(
            touched,
            vec![(b"new".to_vec(), KeyOp::Set), (b"old".to_vec(), KeyOp::Delete)]
        );
        drop(rec);
        assert!(store.has(b"new").unwrap());
    }

    #[test]
    fn test_last_operation_wins() {
        let mut store = MemStore::new();
        let mut rec = RecordingStore::new(&mut store);
        rec.set(b"k".to_vec(), vec![1]).unwrap();
        rec.delete(b"k").unwrap();
        assert_eq!(rec.into_touched().get(b"k".as_slice()), Some(&KeyOp::Delete));
    }
}
