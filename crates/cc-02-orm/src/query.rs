//! Client-facing read access to buckets.
//!
//! Paths name a bucket (`/timedstates`); a `?prefix` suffix switches from
//! exact-id lookup to prefix scan. Results are raw key/value pairs, values
//! re-encoded after migration so clients always see the latest schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use cc_01_kv_store::KvStore;
use serde::{Deserialize, Serialize};
use shared_types::codec::encode;
use shared_types::{ChainError, ChainResult};

use crate::bucket::ModelBucket;
use crate::domain::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Key,
    Prefix,
}

/// One key/value pair returned to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModel {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

pub trait QueryHandler: Send + Sync {
    fn query(
        &self,
        store: &dyn KvStore,
        mode: QueryMode,
        data: &[u8],
    ) -> ChainResult<Vec<QueryModel>>;
}

impl<M: Model> QueryHandler for ModelBucket<M> {
    fn query(
        &self,
        store: &dyn KvStore,
        mode: QueryMode,
        data: &[u8],
    ) -> ChainResult<Vec<QueryModel>> {
        let key = self.db_key(data);
        let raw = match mode {
            QueryMode::Key => store.get(&key)?.map(|v| vec![(key, v)]).unwrap_or_default(),
            QueryMode::Prefix => store.prefix_scan(&key)?,
        };
        raw.into_iter()
            .map(|(key, value)| {
                let model = self.load(&value)?;
                Ok(QueryModel {
                    key,
                    value: encode(&model)?,
                })
            })
            .collect()
    }
}

#[derive(Default, Clone)]
pub struct QueryRouter {
    routes: BTreeMap<String, Arc<dyn QueryHandler>>,
}

impl QueryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: &str, handler: Arc<dyn QueryHandler>) -> ChainResult<()> {
        if self.routes.contains_key(path) {
            return Err(ChainError::human(format!("query path {path} already registered")));
        }
        self.routes.insert(path.to_string(), handler);
        Ok(())
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn query(
        &self,
        store: &dyn KvStore,
        path: &str,
        data: &[u8],
    ) -> ChainResult<Vec<QueryModel>> {
        let (path, mode) = match path.strip_suffix("?prefix") {
            Some(base) => (base, QueryMode::Prefix),
            None => (path, QueryMode::Key),
        };
        let handler = self
            .routes
            .get(path)
            .ok_or_else(|| ChainError::not_found(format!("no query handler for {path}")))?;
        handler.query(store, mode, data)
    }
}

impl std::fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.routes.keys()).finish()
    }
}
