//! Cleaning rules
//!
//! Rules can be written as YAML:
//! ```yaml
//! expected_rows: 15284
//! missing_phone: keep
//! roles:
//!   update_mode: text
//!   contact: phone
//! ```

use super::{ColumnRole, MissingPhone};
use crate::error::EtlError;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Row count the reference `dim_users` load is expected to produce
pub const DIM_USERS_EXPECTED_ROWS: usize = 15_284;

/// Tunable parts of the cleaning routine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningConfig {
    /// Warn when the cleaned row count differs from this
    pub expected_rows: Option<usize>,
    pub missing_phone: MissingPhone,
    /// Column role overrides, keyed by column name
    pub roles: BTreeMap<String, ColumnRole>,
}

impl CleaningConfig {
    /// Rules for the reference `dim_users` dataset
    pub fn dim_users() -> Self {
        Self {
            expected_rows: Some(DIM_USERS_EXPECTED_ROWS),
            ..Self::default()
        }
    }

    pub fn with_expected_rows(mut self, expected_rows: Option<usize>) -> Self {
        self.expected_rows = expected_rows;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| EtlError::Configuration(format!("Invalid cleaning rules: {}", e)).into())
    }

    /// Load rules from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EtlError::Configuration(format!(
                "Cannot read cleaning rules {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
            .wrap_err_with(|| format!("Failed to load cleaning rules from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CleaningConfig::default();
        assert_eq!(config.expected_rows, None);
        assert_eq!(config.missing_phone, MissingPhone::Keep);
        assert!(config.roles.is_empty());

        assert_eq!(
            CleaningConfig::dim_users().expected_rows,
            Some(DIM_USERS_EXPECTED_ROWS)
        );
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "expected_rows: 10\nmissing_phone: empty\nroles:\n  update_mode: text"
        )
        .unwrap();

        let config = CleaningConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.expected_rows, Some(10));
        assert_eq!(config.missing_phone, MissingPhone::Empty);
        assert_eq!(config.roles.get("update_mode"), Some(&ColumnRole::Text));
    }

    #[test]
    fn test_invalid_rules_are_configuration_errors() {
        let err = CleaningConfig::from_yaml_str("missing_phone: sometimes").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::Configuration(_))
        ));

        let err = CleaningConfig::from_yaml_file("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::Configuration(_))
        ));
    }
}
