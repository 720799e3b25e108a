//! Storage ports.

use shared_types::ChainResult;

use crate::domain::{prefix_end, CommitId, Pair};

/// Ordered key/value store.
///
/// All callers run on the single block-processing thread, so writes take
/// `&mut self` and no implementation carries its own locking.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> ChainResult<Option<Vec<u8>>>;

    fn has(&self, key: &[u8]) -> ChainResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> ChainResult<()>;

    /// Remove `key`. Removing an absent key is not an error at this layer.
    fn delete(&mut self, key: &[u8]) -> ChainResult<()>;

    /// Ascending pairs with `start <= key < end`, at most `limit` of them.
    fn range(&self, start: &[u8], end: Option<&[u8]>, limit: Option<usize>)
        -> ChainResult<Vec<Pair>>;

    fn prefix_scan(&self, prefix: &[u8]) -> ChainResult<Vec<Pair>> {
        let end = prefix_end(prefix);
        self.range(prefix, end.as_deref(), None)
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> ChainResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> ChainResult<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> ChainResult<()> {
        (**self).delete(key)
    }

    fn range(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        limit: Option<usize>,
    ) -> ChainResult<Vec<Pair>> {
        (**self).range(start, end, limit)
    }
}

/// A store that can seal its current contents as a new version.
pub trait CommitKvStore: KvStore {
    fn commit(&mut self) -> ChainResult<CommitId>;

    fn last_commit(&self) -> CommitId;
}
