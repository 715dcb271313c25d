//! In-memory tabular data
//!
//! A [`Table`] is an ordered list of column names plus rows holding exactly
//! one [`Cell`] per column.

mod cell;

pub use cell::Cell;

use crate::error::EtlError;
use eyre::Result;

/// Ordered rows sharing one set of columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        check_widths(columns.len(), &rows, 0)?;
        Ok(Self { columns, rows })
    }

    /// A table with columns but no rows
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of the named column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        check_widths(self.columns.len(), std::slice::from_ref(&row), self.rows.len())?;
        self.rows.push(row);
        Ok(())
    }

    /// Append rows; the caller guarantees the column lists match
    pub fn extend_rows(&mut self, rows: Vec<Vec<Cell>>) -> Result<()> {
        check_widths(self.columns.len(), &rows, self.rows.len())?;
        self.rows.extend(rows);
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }
}

fn check_widths(expected: usize, rows: &[Vec<Cell>], offset: usize) -> Result<()> {
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(EtlError::RowWidth {
            row: offset + i,
            expected,
            actual: row.len(),
        }
        .into());
    }
    Ok(())
}
