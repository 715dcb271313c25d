//! Table storage
//!
//! This module handles everything that touches stored tables:
//! - The [`TableStore`] trait the extractor and loader depend on
//! - Conflict handling when writing over an existing table
//! - An in-memory store and an NDJSON directory store
//! - CSV import

mod csv_import;
mod directory;
mod memory;

pub use csv_import::{read_csv, read_csv_from};
pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use crate::error::EtlError;
use crate::table::Table;
use clap::ValueEnum;
use eyre::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("table name pattern is valid"));

/// A store of named tables
pub trait TableStore {
    /// Names of every stored table
    fn list_tables(&self) -> Result<BTreeSet<String>>;

    /// Read a table in full
    ///
    /// # Errors
    /// [`EtlError::TableNotFound`] if no table has that name
    fn read_table(&self, name: &str) -> Result<Table>;

    /// Write a table, resolving name clashes with `policy`
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// [`EtlError::EmptyInput`] if `table` has no rows
    fn write_table(&self, name: &str, table: Table, policy: ConflictPolicy) -> Result<usize>;
}

/// What to do when the target table already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Drop the existing table and recreate it
    #[default]
    Replace,
    /// Add rows to the existing table; columns must match
    Append,
    /// Refuse to touch an existing table
    Fail,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Append => write!(f, "append"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = EtlError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            "fail" => Ok(Self::Fail),
            other => Err(EtlError::Configuration(format!(
                "Unknown conflict policy '{}', expected replace, append or fail",
                other
            ))),
        }
    }
}

/// Reject names that could escape the store or break a file name
pub fn validate_table_name(name: &str) -> Result<()> {
    if TABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(EtlError::InvalidTableName {
            name: name.to_string(),
        }
        .into())
    }
}

/// Work out the table to persist for a write
///
/// Shared by every store so the policies behave the same everywhere.
pub(crate) fn resolve_write(
    name: &str,
    existing: Option<Table>,
    incoming: Table,
    policy: ConflictPolicy,
) -> Result<Table> {
    if incoming.is_empty() {
        return Err(EtlError::empty_input(format!(
            "attempting to write an empty table to '{}'",
            name
        ))
        .into());
    }

    match (existing, policy) {
        (None, _) | (Some(_), ConflictPolicy::Replace) => Ok(incoming),
        (Some(_), ConflictPolicy::Fail) => Err(EtlError::TableExists {
            name: name.to_string(),
        }
        .into()),
        (Some(mut current), ConflictPolicy::Append) => {
            if current.columns() != incoming.columns() {
                return Err(EtlError::SchemaMismatch {
                    name: name.to_string(),
                    expected: current.columns().to_vec(),
                    actual: incoming.columns().to_vec(),
                }
                .into());
            }
            let (_, rows) = incoming.into_parts();
            current.extend_rows(rows)?;
            Ok(current)
        }
    }
}
