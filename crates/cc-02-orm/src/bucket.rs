//! Versioned bucket.
//!
//! A bucket owns the key namespace `{name}:` and every identifier inside it.
//! Values are stored with their schema tag and upgraded through the
//! migration table whenever they are read.

use std::marker::PhantomData;
use std::sync::Arc;

use cc_01_kv_store::KvStore;
use shared_types::codec::{decode, encode};
use shared_types::{validate_id, ChainError, ChainResult, ResultExt};
use tracing::trace;

use crate::domain::{MigrationRegistry, Model, Sequence};

/// How a bucket obtains identifiers for new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Empty id allocates the next sequence value; a caller id must be 8 bytes.
    Sequence,
    /// Caller always supplies the id (e.g. an address).
    Natural,
}

pub struct ModelBucket<M: Model> {
    name: String,
    package: String,
    policy: IdPolicy,
    sequence: Sequence,
    migrations: Arc<MigrationRegistry>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for ModelBucket<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            package: self.package.clone(),
            policy: self.policy,
            sequence: self.sequence.clone(),
            migrations: Arc::clone(&self.migrations),
            _model: PhantomData,
        }
    }
}

impl<M: Model> std::fmt::Debug for ModelBucket<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBucket")
            .field("name", &self.name)
            .field("package", &self.package)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<M: Model> ModelBucket<M> {
    /// Fails with `Human` if `M` has no migrations in `package` or the name
    /// is unusable as a key prefix.
    pub fn new(
        name: &str,
        package: &str,
        policy: IdPolicy,
        migrations: Arc<MigrationRegistry>,
    ) -> ChainResult<Self> {
        if name.is_empty() || name.contains(':') || name.starts_with('_') {
            return Err(ChainError::human(format!("invalid bucket name {name:?}")));
        }
        if !migrations.is_registered::<M>(package) {
            return Err(ChainError::human(format!(
                "bucket {name}: {} has no migrations in package {package}",
                std::any::type_name::<M>()
            )));
        }
        Ok(Self {
            name: name.to_string(),
            package: package.to_string(),
            policy,
            sequence: Sequence::new(name, "id"),
            migrations,
            _model: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Schema version new records are written with: the latest registered.
    pub fn schema(&self) -> ChainResult<u32> {
        self.migrations.latest_version::<M>(&self.package)
    }

    /// Full store key for a record id.
    pub fn db_key(&self, id: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.name.len() + 1 + id.len());
        key.extend_from_slice(self.name.as_bytes());
        key.push(b':');
        key.extend_from_slice(id);
        key
    }

    /// Validate and store `model`, returning the id it was stored under.
    pub fn put(&self, store: &mut dyn KvStore, id: &[u8], model: &M) -> ChainResult<Vec<u8>> {
        model.validate()?;
        let id = match self.policy {
            IdPolicy::Sequence if id.is_empty() => self.sequence.next_id(store)?,
            IdPolicy::Sequence => {
                validate_id(id).map_err(|e| e.field("ID"))?;
                id.to_vec()
            }
            IdPolicy::Natural if id.is_empty() => {
                return Err(ChainError::empty("id required").field("ID"));
            }
            IdPolicy::Natural => id.to_vec(),
        };
        let raw = encode(model).wrap_err(format!("encode {}", self.name))?;
        store.set(self.db_key(&id), raw)?;
        trace!(bucket = %self.name, id = %hex::encode(&id), "record stored");
        Ok(id)
    }

    pub fn get(&self, store: &dyn KvStore, id: &[u8]) -> ChainResult<Option<M>> {
        match store.get(&self.db_key(id))? {
            None => Ok(None),
            Some(raw) => self.load(&raw).map(Some),
        }
    }

    /// Like [`get`](Self::get) but absence is `NotFound`.
    pub fn one(&self, store: &dyn KvStore, id: &[u8]) -> ChainResult<M> {
        self.get(store, id)?
            .ok_or_else(|| self.not_found(id))
    }

    /// `Ok(())` if the id exists, `NotFound` otherwise.
    pub fn has(&self, store: &dyn KvStore, id: &[u8]) -> ChainResult<()> {
        if store.has(&self.db_key(id))? {
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    /// Remove a record. Missing ids are `NotFound`.
    pub fn delete(&self, store: &mut dyn KvStore, id: &[u8]) -> ChainResult<()> {
        self.has(store, id)?;
        store.delete(&self.db_key(id))?;
        trace!(bucket = %self.name, id = %hex::encode(id), "record deleted");
        Ok(())
    }

    /// Every record in id order.
    pub fn all(&self, store: &dyn KvStore) -> ChainResult<Vec<(Vec<u8>, M)>> {
        let prefix = self.db_key(&[]);
        store
            .prefix_scan(&prefix)?
            .into_iter()
            .map(|(key, raw)| Ok((key[prefix.len()..].to_vec(), self.load(&raw)?)))
            .collect()
    }

    /// Decode stored bytes and bring them to the latest schema.
    pub fn load(&self, raw: &[u8]) -> ChainResult<M> {
        let mut model: M = decode(raw).wrap_err(format!("decode {}", self.name))?;
        self.migrations.migrate(&self.package, &mut model)?;
        Ok(model)
    }

    fn not_found(&self, id: &[u8]) -> ChainError {
        ChainError::not_found(format!("{} {}", self.name, hex::encode(id)))
    }
}
