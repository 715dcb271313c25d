//! Table loader
//!
//! Writes a table to a store under a conflict policy.

use crate::error::EtlError;
use crate::etl::Loader;
use crate::storage::{ConflictPolicy, TableStore};
use crate::table::Table;

use eyre::{Context, Result};

/// Loader for a single stored table
pub struct TableLoader<'a, S: TableStore> {
    store: &'a S,
    name: String,
    policy: ConflictPolicy,
}

impl<'a, S: TableStore> TableLoader<'a, S> {
    /// Create a new table loader
    ///
    /// # Arguments
    /// * `store` - Store to write to
    /// * `name` - Target table
    /// * `policy` - What to do if the target already exists
    pub fn new(store: &'a S, name: impl Into<String>, policy: ConflictPolicy) -> Self {
        Self {
            store,
            name: name.into(),
            policy,
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }
}

impl<S: TableStore> Loader for TableLoader<'_, S> {
    type Input = Table;

    fn load(&self, input: Self::Input) -> Result<usize> {
        if input.is_empty() {
            return Err(EtlError::empty_input(format!(
                "attempting to upload an empty table to '{}'",
                self.name
            ))
            .into());
        }

        log::debug!(
            "Uploading {} rows to '{}' with policy '{}'",
            input.row_count(),
            self.name,
            self.policy
        );

        let count = self
            .store
            .write_table(&self.name, input, self.policy)
            .with_context(|| format!("Failed to upload table '{}'", self.name))?;

        log::info!("Uploaded {} rows to '{}'", count, self.name);
        Ok(count)
    }
}
