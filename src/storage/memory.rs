//! In-process table store

use super::{ConflictPolicy, TableStore, resolve_write, validate_table_name};
use crate::error::EtlError;
use crate::table::Table;
use eyre::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Tables held in memory for the lifetime of the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<BTreeMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table directly, replacing any existing one
    pub fn with_table(self, name: impl Into<String>, table: Table) -> Self {
        self.tables.borrow_mut().insert(name.into(), table);
        self
    }
}

impl TableStore for MemoryStore {
    fn list_tables(&self) -> Result<BTreeSet<String>> {
        Ok(self.tables.borrow().keys().cloned().collect())
    }

    fn read_table(&self, name: &str) -> Result<Table> {
        self.tables
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| EtlError::table_not_found(name).into())
    }

    fn write_table(&self, name: &str, table: Table, policy: ConflictPolicy) -> Result<usize> {
        validate_table_name(name)?;
        let written = table.row_count();
        let existing = self.tables.borrow().get(name).cloned();
        let resolved = resolve_write(name, existing, table, policy)?;
        self.tables.borrow_mut().insert(name.to_string(), resolved);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_read_write() {
        let store = MemoryStore::new();
        let table = Table::new(vec!["a".into()], vec![vec![Cell::Integer(1)]]).unwrap();

        assert_eq!(
            store
                .write_table("t", table.clone(), ConflictPolicy::Replace)
                .unwrap(),
            1
        );
        assert_eq!(store.read_table("t").unwrap(), table);
        assert_eq!(store.list_tables().unwrap(), BTreeSet::from(["t".to_string()]));
    }

    #[test]
    fn test_missing_table() {
        let err = MemoryStore::new().read_table("nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EtlError>(),
            Some(EtlError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_append_reports_rows_written() {
        let table = Table::new(vec!["a".into()], vec![vec![Cell::Integer(1)]]).unwrap();
        let store = MemoryStore::new().with_table("t", table.clone());

        assert_eq!(
            store.write_table("t", table, ConflictPolicy::Append).unwrap(),
            1
        );
        assert_eq!(store.read_table("t").unwrap().row_count(), 2);
    }
}
