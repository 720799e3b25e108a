use std::any::Any;
use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use shared_types::{Metadata, Validate};

/// Anything that carries a schema version tag.
pub trait Versioned: Any + Send + Sync {
    fn metadata(&self) -> &Metadata;
    fn metadata_mut(&mut self) -> &mut Metadata;
}

/// A record that can live in a [`ModelBucket`](crate::ModelBucket).
pub trait Model: Versioned + Validate + Serialize + DeserializeOwned + Clone + Debug {}

impl<T> Model for T where T: Versioned + Validate + Serialize + DeserializeOwned + Clone + Debug {}
