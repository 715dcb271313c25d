//! Table extractor
//!
//! Reads one named table from a store, checking the store's listing first.

use crate::error::EtlError;
use crate::etl::Extractor;
use crate::storage::TableStore;
use crate::table::Table;

use eyre::{Context, Result};

/// Extractor for a single stored table
///
/// # Example
/// ```
/// use dim_users_etl::etl::Extractor;
/// use dim_users_etl::storage::MemoryStore;
/// use dim_users_etl::table::{Cell, Table};
/// use dim_users_etl::tables::TableExtractor;
///
/// let users = Table::new(vec!["id".into()], vec![vec![Cell::Integer(1)]]).unwrap();
/// let store = MemoryStore::new().with_table("legacy_users", users.clone());
///
/// let extractor = TableExtractor::new(&store, "legacy_users");
/// assert_eq!(extractor.extract().unwrap(), users);
/// ```
pub struct TableExtractor<'a, S: TableStore> {
    store: &'a S,
    name: String,
}

impl<'a, S: TableStore> TableExtractor<'a, S> {
    /// Create a new table extractor
    ///
    /// # Arguments
    /// * `store` - Store to read from
    /// * `name` - Table to read
    pub fn new(store: &'a S, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: TableStore> Extractor for TableExtractor<'_, S> {
    type Output = Table;

    fn extract(&self) -> Result<Self::Output> {
        let available = self
            .store
            .list_tables()
            .with_context(|| "Failed to list tables in the store")?;

        if !available.contains(&self.name) {
            return Err(EtlError::table_not_found(&self.name).into());
        }

        let table = self
            .store
            .read_table(&self.name)
            .with_context(|| format!("Failed to read table '{}'", self.name))?;

        log::info!(
            "Extracted {} rows x {} columns from '{}'",
            table.row_count(),
            table.column_count(),
            self.name
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ConflictPolicy, MemoryStore};
    use crate::table::Cell;
    use std::cell::Cell as Counter;
    use std::collections::BTreeSet;

    /// Store that lists one table but counts reads
    struct CountingStore {
        reads: Counter<usize>,
    }

    impl TableStore for CountingStore {
        fn list_tables(&self) -> Result<BTreeSet<String>> {
            Ok(BTreeSet::from(["present".to_string()]))
        }

        fn read_table(&self, _name: &str) -> Result<Table> {
            self.reads.set(self.reads.get() + 1);
            Table::new(vec!["a".into()], vec![vec![Cell::Integer(1)]])
        }

        fn write_table(&self, _: &str, _: Table, _: ConflictPolicy) -> Result<usize> {
            unreachable!("extractors never write")
        }
    }

    #[test]
    fn test_missing_table_is_not_read() {
        let store = CountingStore {
            reads: Counter::new(0),
        };

        let err = TableExtractor::new(&store, "absent").extract().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::TableNotFound { name }) if name == "absent"
        ));
        assert_eq!(store.reads.get(), 0);

        TableExtractor::new(&store, "present").extract().unwrap();
        assert_eq!(store.reads.get(), 1);
    }

    #[test]
    fn test_returns_table_unmodified() {
        let raw = Table::new(
            vec![" First Name ".into()],
            vec![vec![Cell::text(" Ada ")], vec![Cell::text(" Ada ")]],
        )
        .unwrap();
        let store = MemoryStore::new().with_table("legacy_users", raw.clone());

        let extractor = TableExtractor::new(&store, "legacy_users");
        assert_eq!(extractor.name(), "legacy_users");
        assert_eq!(extractor.extract().unwrap(), raw);
    }
}
