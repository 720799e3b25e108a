//! Schema migration table.
//!
//! Built once at process start, verified, then shared read-only
//! (`Arc<MigrationRegistry>`) with every bucket and handler that decodes
//! versioned values. Tests build their own isolated registries.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use shared_types::{ChainError, ChainResult, ResultExt, Validate};
use tracing::debug;

use super::model::Versioned;

type MigrationFn = Arc<dyn Fn(&mut dyn Any) -> ChainResult<()> + Send + Sync>;

struct TypeMigrations {
    type_name: &'static str,
    steps: BTreeMap<u32, MigrationFn>,
}

/// Migration step that leaves the value as it is.
pub fn no_modification<T>(_: &mut T) -> ChainResult<()> {
    Ok(())
}

#[derive(Default)]
pub struct MigrationRegistry {
    types: HashMap<(String, TypeId), TypeMigrations>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the step that upgrades `T` in `package` to `version`.
    ///
    /// Version 1 is the initial schema; its step runs only on values
    /// that were never tagged, which validation rejects anyway.
    pub fn register<T, F>(&mut self, package: &str, version: u32, step: F) -> ChainResult<()>
    where
        T: Versioned,
        F: Fn(&mut T) -> ChainResult<()> + Send + Sync + 'static,
    {
        if version == 0 {
            return Err(ChainError::human(format!(
                "{}: migration version must be greater than zero",
                type_name::<T>()
            )));
        }
        let entry = self
            .types
            .entry((package.to_string(), TypeId::of::<T>()))
            .or_insert_with(|| TypeMigrations {
                type_name: type_name::<T>(),
                steps: BTreeMap::new(),
            });
        if entry.steps.contains_key(&version) {
            return Err(ChainError::human(format!(
                "{}/{}: migration for version {} already registered",
                package,
                type_name::<T>(),
                version
            )));
        }
        let wrapped: MigrationFn = Arc::new(move |value: &mut dyn Any| {
            let value = value.downcast_mut::<T>().ok_or_else(|| {
                ChainError::human(format!("migration expected {}", type_name::<T>()))
            })?;
            step(value)
        });
        entry.steps.insert(version, wrapped);
        debug!(package, version, model = type_name::<T>(), "migration registered");
        Ok(())
    }

    /// Every registered type must have contiguous versions starting at 1.
    pub fn verify(&self) -> ChainResult<()> {
        for ((package, _), migrations) in &self.types {
            for (expected, version) in (1u32..).zip(migrations.steps.keys()) {
                if *version != expected {
                    return Err(ChainError::human(format!(
                        "{}/{}: missing migration for version {}",
                        package, migrations.type_name, expected
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_registered<T: Versioned>(&self, package: &str) -> bool {
        self.types
            .contains_key(&(package.to_string(), TypeId::of::<T>()))
    }

    /// Highest registered version for `T` in `package`.
    pub fn latest_version<T: Versioned>(&self, package: &str) -> ChainResult<u32> {
        self.lookup::<T>(package)?
            .steps
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| ChainError::human(format!("{}: no migrations", type_name::<T>())))
    }

    /// Upgrade `value` to the latest schema. A value already at the latest
    /// version is left untouched.
    pub fn migrate<T: Versioned>(&self, package: &str, value: &mut T) -> ChainResult<()> {
        let migrations = self.lookup::<T>(package)?;
        let current = value.metadata().schema;
        if current == 0 {
            return Err(ChainError::metadata("schema version missing"));
        }
        let latest = migrations.steps.keys().next_back().copied().unwrap_or(0);
        if current > latest {
            return Err(ChainError::metadata(format!(
                "unsupported schema version {current}, latest is {latest}"
            )));
        }
        for version in current + 1..=latest {
            let step = migrations.steps.get(&version).ok_or_else(|| {
                ChainError::human(format!(
                    "{}/{}: missing migration for version {}",
                    package, migrations.type_name, version
                ))
            })?;
            step(&mut *value as &mut dyn Any).wrap_err(format!("migrate to version {version}"))?;
            value.metadata_mut().schema = version;
        }
        Ok(())
    }

    /// Migrated copy of `value`, for borrowed inputs such as messages.
    pub fn migrated<T: Versioned + Clone>(&self, package: &str, value: &T) -> ChainResult<T> {
        let mut copy = value.clone();
        self.migrate(package, &mut copy)?;
        Ok(copy)
    }

    /// Migrated and validated copy of a borrowed input such as a message.
    ///
    /// An unset schema cannot be migrated; validation reports it together
    /// with every other field error instead.
    pub fn prepare<T: Versioned + Validate + Clone>(
        &self,
        package: &str,
        value: &T,
    ) -> ChainResult<T> {
        if value.metadata().schema == 0 {
            value.validate()?;
            return Err(ChainError::metadata("schema version missing").field("Metadata"));
        }
        let copy = self.migrated(package, value)?;
        copy.validate()?;
        Ok(copy)
    }

    fn lookup<T: Versioned>(&self, package: &str) -> ChainResult<&TypeMigrations> {
        self.types
            .get(&(package.to_string(), TypeId::of::<T>()))
            .ok_or_else(|| {
                ChainError::human(format!(
                    "{}/{}: no migrations registered",
                    package,
                    type_name::<T>()
                ))
            })
    }
}

impl std::fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for ((package, _), migrations) in &self.types {
            list.entry(
                &format!("{}/{}", package, migrations.type_name),
                &migrations.steps.keys().collect::<Vec<_>>(),
            );
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ErrorKind, Metadata};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        metadata: Metadata,
        text: String,
    }

    impl Versioned for Note {
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }
        fn metadata_mut(&mut self) -> &mut Metadata {
            &mut self.metadata
        }
    }

    fn note(schema: u32, text: &str) -> Note {
        Note {
            metadata: Metadata::new(schema),
            text: text.to_string(),
        }
    }

    fn registry() -> MigrationRegistry {
        let mut reg = MigrationRegistry::new();
        reg.register::<Note, _>("notes", 1, no_modification).unwrap();
        reg.register::<Note, _>("notes", 2, |n: &mut Note| {
            n.text = n.text.to_uppercase();
            Ok(())
        })
        .unwrap();
        reg
    }

    #[test]
    fn test_migrate_upgrades_old_value() {
        let reg = registry();
        let mut n = note(1, "hello");
        reg.migrate("notes", &mut n).unwrap();
        assert_eq!(n, note(2, "HELLO"));
    }

    #[test]
    fn test_migrate_is_idempotent_at_latest() {
        let reg = registry();
        let mut n = note(2, "hello");
        reg.migrate("notes", &mut n).unwrap();
        reg.migrate("notes", &mut n).unwrap();
        assert_eq!(n, note(2, "hello"));
    }

    #[test]
    fn test_migrate_rejects_unset_and_future_schema() {
        let reg = registry();
        assert!(reg
            .migrate("notes", &mut note(0, "x"))
            .unwrap_err()
            .is(ErrorKind::Metadata));
        assert!(reg
            .migrate("notes", &mut note(3, "x"))
            .unwrap_err()
            .is(ErrorKind::Metadata));
    }

    #[test]
    fn test_unregistered_type_is_human_error() {
        let reg = MigrationRegistry::new();
        let err = reg.migrate("notes", &mut note(1, "x")).unwrap_err();
        assert!(err.is(ErrorKind::Human));
        assert!(!reg.is_registered::<Note>("notes"));
    }

    #[test]
    fn test_package_scoping() {
        let reg = registry();
        assert!(reg.is_registered::<Note>("notes"));
        assert!(!reg.is_registered::<Note>("other"));
    }

    #[test]
    fn test_register_rejects_zero_and_duplicates() {
        let mut reg = registry();
        assert!(reg
            .register::<Note, _>("notes", 0, no_modification)
            .unwrap_err()
            .is(ErrorKind::Human));
        assert!(reg
            .register::<Note, _>("notes", 2, no_modification)
            .unwrap_err()
            .is(ErrorKind::Human));
    }

    #[test]
    fn test_verify_detects_gap() {
        let mut reg = MigrationRegistry::new();
        reg.register::<Note, _>("notes", 1, no_modification).unwrap();
        reg.register::<Note, _>("notes", 3, no_modification).unwrap();
        let err = reg.verify().unwrap_err();
        assert!(err.is(ErrorKind::Human));
        assert!(err.to_string().contains("version 2"));

        assert!(registry().verify().is_ok());
        assert_eq!(registry().latest_version::<Note>("notes").unwrap(), 2);
    }

    #[test]
    fn test_failing_step_keeps_kind() {
        let mut reg = MigrationRegistry::new();
        reg.register::<Note, _>("notes", 1, no_modification).unwrap();
        reg.register::<Note, _>("notes", 2, |_: &mut Note| Err(ChainError::schema("bad")))
            .unwrap();
        let mut n = note(1, "x");
        let err = reg.migrate("notes", &mut n).unwrap_err();
        assert!(err.is(ErrorKind::Schema));
        assert_eq!(n.metadata.schema, 1);
    }
}
