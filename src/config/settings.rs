//! Store and table selection from environment variables
//!
//! Expected environment variables (a `.env` file is sourced first by the CLI):
//! - DIMCLEAN_STORE: directory holding the table store (required)
//! - DIMCLEAN_SOURCE_TABLE: raw table to clean (optional, defaults to `legacy_users`)
//! - DIMCLEAN_TARGET_TABLE: table to upload to (optional, defaults to `dim_users`)
//! - DIMCLEAN_CONFLICT_POLICY: `replace`, `append` or `fail` (optional, defaults to `replace`)

use crate::error::EtlError;
use crate::storage::ConflictPolicy;
use eyre::Result;
use std::path::PathBuf;

pub const ENV_STORE: &str = "DIMCLEAN_STORE";
pub const ENV_SOURCE_TABLE: &str = "DIMCLEAN_SOURCE_TABLE";
pub const ENV_TARGET_TABLE: &str = "DIMCLEAN_TARGET_TABLE";
pub const ENV_CONFLICT_POLICY: &str = "DIMCLEAN_CONFLICT_POLICY";

pub const DEFAULT_SOURCE_TABLE: &str = "legacy_users";
pub const DEFAULT_TARGET_TABLE: &str = "dim_users";

/// Where a run reads from and writes to
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub store: PathBuf,
    pub source_table: String,
    pub target_table: String,
    pub policy: ConflictPolicy,
}

impl StoreSettings {
    /// Resolve settings, preferring explicit values over the environment
    ///
    /// # Errors
    /// [`EtlError::Configuration`] if no store is given or the conflict
    /// policy is not recognised.
    pub fn resolve(
        store: Option<PathBuf>,
        source_table: Option<String>,
        target_table: Option<String>,
        policy: Option<ConflictPolicy>,
    ) -> Result<Self> {
        let store = store
            .or_else(|| env_value(ENV_STORE).map(PathBuf::from))
            .ok_or_else(|| {
                EtlError::Configuration(format!(
                    "{} environment variable not set and no --store given",
                    ENV_STORE
                ))
            })?;

        let policy = match policy {
            Some(policy) => policy,
            None => env_value(ENV_CONFLICT_POLICY)
                .map(|raw| raw.parse::<ConflictPolicy>())
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Self {
            store,
            source_table: source_table
                .or_else(|| env_value(ENV_SOURCE_TABLE))
                .unwrap_or_else(|| DEFAULT_SOURCE_TABLE.to_string()),
            target_table: target_table
                .or_else(|| env_value(ENV_TARGET_TABLE))
                .unwrap_or_else(|| DEFAULT_TARGET_TABLE.to_string()),
            policy,
        })
    }

    /// Settings taken from the environment alone
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None, None, None)
    }
}

/// Non-empty value of an environment variable
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        unsafe {
            std::env::remove_var(ENV_STORE);
            std::env::remove_var(ENV_SOURCE_TABLE);
            std::env::remove_var(ENV_TARGET_TABLE);
            std::env::remove_var(ENV_CONFLICT_POLICY);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_store_is_required() {
        clear_env();

        let result = StoreSettings::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(ENV_STORE));
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults_from_env() {
        clear_env();
        unsafe {
            std::env::set_var(ENV_STORE, "/tmp/warehouse");
        }

        let settings = StoreSettings::from_env().unwrap();
        assert_eq!(settings.store, PathBuf::from("/tmp/warehouse"));
        assert_eq!(settings.source_table, DEFAULT_SOURCE_TABLE);
        assert_eq!(settings.target_table, DEFAULT_TARGET_TABLE);
        assert_eq!(settings.policy, ConflictPolicy::Replace);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_explicit_values_override_env() {
        clear_env();
        unsafe {
            std::env::set_var(ENV_STORE, "/tmp/warehouse");
            std::env::set_var(ENV_TARGET_TABLE, "from_env");
            std::env::set_var(ENV_CONFLICT_POLICY, "append");
        }

        let settings = StoreSettings::resolve(
            Some(PathBuf::from("/data")),
            Some("raw".into()),
            None,
            Some(ConflictPolicy::Fail),
        )
        .unwrap();
        assert_eq!(settings.store, PathBuf::from("/data"));
        assert_eq!(settings.source_table, "raw");
        assert_eq!(settings.target_table, "from_env");
        assert_eq!(settings.policy, ConflictPolicy::Fail);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_policy() {
        clear_env();
        unsafe {
            std::env::set_var(ENV_STORE, "/tmp/warehouse");
            std::env::set_var(ENV_CONFLICT_POLICY, "upsert");
        }

        let err = StoreSettings::from_env().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::Configuration(_))
        ));

        clear_env();
    }
}
