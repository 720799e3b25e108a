use cc_01_kv_store::KvStore;
use shared_types::{sequence_id, ChainError, ChainResult};

/// Monotonic counter stored under `_s.{bucket}:{name}`.
#[derive(Debug, Clone)]
pub struct Sequence {
    key: Vec<u8>,
}

impl Sequence {
    pub fn new(bucket: &str, name: &str) -> Self {
        Self {
            key: format!("_s.{bucket}:{name}").into_bytes(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Last value handed out, zero if none.
    pub fn current(&self, store: &dyn KvStore) -> ChainResult<u64> {
        match store.get(&self.key)? {
            None => Ok(0),
            Some(raw) => {
                let bytes: [u8; 8] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| ChainError::database("corrupted sequence value"))?;
                Ok(u64::from_be_bytes(bytes))
            }
        }
    }

    pub fn next_val(&self, store: &mut dyn KvStore) -> ChainResult<u64> {
        let next = self
            .current(store)?
            .checked_add(1)
            .ok_or_else(|| ChainError::overflow("sequence exhausted"))?;
        store.set(self.key.clone(), next.to_be_bytes().to_vec())?;
        Ok(next)
    }

    /// Next value encoded as an 8-byte identifier.
    pub fn next_id(&self, store: &mut dyn KvStore) -> ChainResult<Vec<u8>> {
        Ok(sequence_id(self.next_val(store)?))
    }
}
