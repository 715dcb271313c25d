//! Directory-backed table store
//!
//! Each table lives in `<root>/<name>.ndjson`. The first line is a header
//! naming the columns, every following line is one row encoded as a JSON
//! array of cells:
//!
//! ```text
//! {"columns":["first_name","join_date"]}
//! ["Ada",{"$timestamp":"2020-01-15T00:00:00"}]
//! ["Bob",{"$unparseable":true}]
//! ```

use super::{ConflictPolicy, TableStore, resolve_write, validate_table_name};
use crate::error::EtlError;
use crate::table::{Cell, Table};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "ndjson";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    columns: Vec<String>,
}

/// Tables stored as NDJSON files under one directory
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create store directory: {}", root.display()))?;
        log::debug!("Opened table store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, EXTENSION))
    }

    fn read_file(&self, name: &str, path: &Path) -> Result<Table> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read table file: {}", path.display()))?;

        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header_line) = lines
            .next()
            .ok_or_else(|| eyre::eyre!("Table file for '{}' has no header", name))?;
        let header: Header = serde_json::from_str(header_line)
            .with_context(|| format!("Invalid header in {}", path.display()))?;

        let mut table = Table::with_columns(header.columns);
        for (line_no, line) in lines {
            let values: Vec<Value> = serde_json::from_str(line).with_context(|| {
                format!("Failed to parse row at {}:{}", path.display(), line_no + 1)
            })?;
            let row = values
                .iter()
                .map(Cell::from_json)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Invalid cell at {}:{}", path.display(), line_no + 1))?;
            table.push_row(row)?;
        }

        Ok(table)
    }

    fn write_file(&self, path: &Path, table: &Table) -> Result<()> {
        let mut content = serde_json::to_string(&Header {
            columns: table.columns().to_vec(),
        })?;
        content.push('\n');

        for row in table.rows() {
            let values: Vec<Value> = row.iter().map(Cell::to_json).collect();
            content.push_str(&serde_json::to_string(&values)?);
            content.push('\n');
        }

        // Write beside the target and rename so readers never see a partial table
        let staging = path.with_extension(format!("{}.tmp", EXTENSION));
        std::fs::write(&staging, content)
            .with_context(|| format!("Failed to write table file: {}", staging.display()))?;
        std::fs::rename(&staging, path)
            .with_context(|| format!("Failed to replace table file: {}", path.display()))?;

        Ok(())
    }
}

impl TableStore for DirectoryStore {
    fn list_tables(&self) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();

        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list store: {}", self.root.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some(EXTENSION)
                && let Some(name) = path.file_stem().and_then(|s| s.to_str())
                && validate_table_name(name).is_ok()
            {
                names.insert(name.to_string());
            }
        }

        Ok(names)
    }

    fn read_table(&self, name: &str) -> Result<Table> {
        validate_table_name(name)?;
        let path = self.table_path(name);
        if !path.exists() {
            return Err(EtlError::table_not_found(name).into());
        }

        log::debug!("Reading table '{}' from {}", name, path.display());
        self.read_file(name, &path)
    }

    fn write_table(&self, name: &str, table: Table, policy: ConflictPolicy) -> Result<usize> {
        validate_table_name(name)?;
        let path = self.table_path(name);
        let written = table.row_count();

        let existing = if path.exists() {
            Some(self.read_file(name, &path)?)
        } else {
            None
        };
        let resolved = resolve_write(name, existing, table, policy)?;

        log::debug!(
            "Writing {} rows to '{}' ({})",
            resolved.row_count(),
            name,
            policy
        );
        self.write_file(&path, &resolved)?;
        Ok(written)
    }
}
