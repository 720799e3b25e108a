pub mod migration;
pub mod model;
pub mod sequence;

pub use migration::{no_modification, MigrationRegistry};
pub use model::{Model, Versioned};
pub use sequence::Sequence;
