//! Cross-cutting decorators shared by the user and scheduler stacks.

mod action_tagger;
mod key_tagger;
mod logging;
mod recovery;
mod savepoint;

pub use action_tagger::{ActionTagger, ACTION_TAG};
pub use key_tagger::KeyTagger;
pub use logging::Logging;
pub use recovery::Recovery;
pub use savepoint::{with_savepoint, Savepoint};
