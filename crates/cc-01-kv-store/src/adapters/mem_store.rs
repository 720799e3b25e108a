use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use shared_types::ChainResult;
use tracing::debug;

use crate::domain::{in_range, CommitId, Pair};
use crate::ports::{CommitKvStore, KvStore};

/// In-memory committed store.
///
/// `Clone` gives an independent snapshot, which the application uses as the
/// check state between commits.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    last_commit: CommitId,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// SHA-256 over length-prefixed keys and values in key order.
    fn app_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (key, value) in &self.data {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }
        hasher.finalize().into()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> ChainResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> ChainResult<()> {
        self.data.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> ChainResult<()> {
        self.data.remove(key);
        Ok(())
    }

    fn range(
        &self,
        start: &[u8],
        end: Option<&[u8]>,
        limit: Option<usize>,
    ) -> ChainResult<Vec<Pair>> {
        let iter = self
            .data
            .range(start.to_vec()..)
            .take_while(|(k, _)| in_range(k, start, end))
            .map(|(k, v)| (k.clone(), v.clone()));
        Ok(match limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        })
    }
}

impl CommitKvStore for MemStore {
    fn commit(&mut self) -> ChainResult<CommitId> {
        self.last_commit = CommitId {
            version: self.last_commit.version + 1,
            hash: self.app_hash(),
        };
        debug!(
            version = self.last_commit.version,
            keys = self.data.len(),
            "store committed"
        );
        Ok(self.last_commit)
    }

    fn last_commit(&self) -> CommitId {
        self.last_commit
    }
}
