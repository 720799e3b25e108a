pub mod models;
pub mod msgs;

use std::sync::Arc;

use cc_02_orm::{no_modification, IdPolicy, MigrationRegistry, ModelBucket};
use shared_types::{ChainError, ChainResult, Condition};

pub use models::{InnerState, InnerStateEnum, State, TimedState};
pub use msgs::{
    CreateStateMsg, CreateTimedStateMsg, DeleteTimedStateMsg, CREATE_STATE_PATH,
    CREATE_TIMED_STATE_PATH, DELETE_TIMED_STATE_PATH,
};

pub const PACKAGE: &str = "custom";
pub const STATE_BUCKET: &str = "states";
pub const TIMED_STATE_BUCKET: &str = "timedstates";

/// Literal every custom string must start with.
pub const CUSTOM_STRING_PREFIX: &str = "cstm";

/// Condition a scheduled deletion of timed record `id` runs under.
pub fn timed_state_condition(id: &[u8]) -> Condition {
    Condition::new(PACKAGE, "timed_state", id.to_vec())
}

/// Empty and wrong-prefix values are distinct errors.
pub fn validate_custom_string(value: &str) -> ChainResult<()> {
    if value.is_empty() {
        return Err(ChainError::empty("required"));
    }
    if !value.starts_with(CUSTOM_STRING_PREFIX) {
        return Err(ChainError::input(format!(
            "must start with {CUSTOM_STRING_PREFIX:?}"
        )));
    }
    Ok(())
}

pub fn register_migrations(registry: &mut MigrationRegistry) -> ChainResult<()> {
    registry.register::<State, _>(PACKAGE, 1, no_modification)?;
    registry.register::<TimedState, _>(PACKAGE, 1, no_modification)?;
    registry.register::<CreateStateMsg, _>(PACKAGE, 1, no_modification)?;
    registry.register::<CreateTimedStateMsg, _>(PACKAGE, 1, no_modification)?;
    registry.register::<DeleteTimedStateMsg, _>(PACKAGE, 1, no_modification)
}

pub fn state_bucket(migrations: Arc<MigrationRegistry>) -> ChainResult<ModelBucket<State>> {
    ModelBucket::new(STATE_BUCKET, PACKAGE, IdPolicy::Sequence, migrations)
}

pub fn timed_state_bucket(
    migrations: Arc<MigrationRegistry>,
) -> ChainResult<ModelBucket<TimedState>> {
    ModelBucket::new(TIMED_STATE_BUCKET, PACKAGE, IdPolicy::Sequence, migrations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ErrorKind;

    #[test]
    fn test_custom_string() {
        assert!(validate_custom_string("cstmHello").is_ok());
        assert!(validate_custom_string("").unwrap_err().is(ErrorKind::Empty));
        assert!(validate_custom_string("hello").unwrap_err().is(ErrorKind::Input));
    }

    #[test]
    fn test_condition_is_per_record() {
        assert_ne!(
            timed_state_condition(&[0, 0, 0, 0, 0, 0, 0, 1]).address(),
            timed_state_condition(&[0, 0, 0, 0, 0, 0, 0, 2]).address()
        );
    }
}
