use std::collections::BTreeMap;

use shared_types::ChainResult;

use crate::domain::{in_range, Pair};
use crate::ports::KvStore;

/// Write-buffering overlay over a parent store (a savepoint).
///
/// Reads see the parent merged with buffered writes. [`CacheWrap::write`]
/// flushes the buffer into the parent; dropping or [`CacheWrap::discard`]
/// leaves the parent untouched. Overlays nest.
pub struct CacheWrap<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    // None marks a buffered delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheWrap<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            pending: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn write(self) -> ChainResult<()> {
        for (key, value) in self.pending {
            match value {
                Some(value) => self.parent.set(key, value)?,
                None => self.parent.delete(&key)?,
            }
        }
        Ok(())
    }

    pub fn discard(self) {}
}

impl<S: KvStore + ?Sized> KvStore for CacheWrap<'_, S> {
    fn get(&self, key: &[u8]) -> ChainResult<Option<Vec<u8>>> {
        match self.pending.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> ChainResult<()> {
        self.pending.insert(key, Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> ChainResult<()> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn range(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        limit: Option<usize>,
    ) -> ChainResult<Vec<Pair>> {
        // Parent limit cannot be applied: buffered deletes may hide entries.
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.range(start, end, None)?.into_iter().collect();
        for (key, value) in self
            .pending
            .range(start.to_vec()..)
            .take_while(|(k, _)| in_range(k, start, end))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        let iter = merged.into_iter();
        Ok(match limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        })
    }
}
