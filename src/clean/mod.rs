//! The `dim_users` cleaning routine
//!
//! [`Cleaner::clean`] runs a fixed, order-sensitive sequence of steps over a
//! borrowed [`Table`] and returns a new one:
//!
//! 1. Normalize column names
//! 2. Drop rows where every cell is missing
//! 3. Drop duplicate rows, keeping the first occurrence
//! 4. Parse date-like columns, marking failures as [`Cell::Unparseable`]
//! 5. Reduce phone-like columns to digits
//! 6. Trim textual columns
//! 7. Fill missing textual cells with `"Unknown"`, then drop any duplicates
//!    the value normalization produced
//! 8. Warn if the row count differs from the configured expectation

mod config;
mod dates;
mod phone;
mod roles;

pub use config::{CleaningConfig, DIM_USERS_EXPECTED_ROWS};
pub use dates::{parse_date_cell, parse_timestamp};
pub use phone::{MissingPhone, normalize_phone};
pub use roles::{ColumnRole, ColumnRoles, is_date_like, is_phone_like, normalize_column_name};

use crate::error::EtlError;
use crate::etl::Transformer;
use crate::table::{Cell, Table};
use eyre::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Placeholder written into missing textual cells
pub const UNKNOWN: &str = "Unknown";

/// Final row count differed from the expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCountMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// What a cleaning run changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub empty_rows_dropped: usize,
    pub duplicates_dropped: usize,
    /// Rows that only became identical after dates, phones and text were normalized
    pub late_duplicates_dropped: usize,
    /// Newly unparseable cells per date-like column
    pub unparseable_dates: BTreeMap<String, usize>,
    pub unknown_filled: usize,
    pub roles: Vec<(String, ColumnRole)>,
    pub row_count_mismatch: Option<RowCountMismatch>,
}

/// Cleans raw user tables into the `dim_users` shape
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleaningConfig,
}

impl Cleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a table, leaving the input untouched
    ///
    /// # Errors
    /// [`EtlError::EmptyInput`] if the table has no rows or no columns
    pub fn clean(&self, table: &Table) -> Result<Table> {
        self.clean_with_report(table).map(|(cleaned, _)| cleaned)
    }

    /// Clean a table and describe what changed
    pub fn clean_with_report(&self, table: &Table) -> Result<(Table, CleanReport)> {
        if table.is_empty() || table.column_count() == 0 {
            return Err(EtlError::empty_input(format!(
                "received a table with {} rows and {} columns for cleaning",
                table.row_count(),
                table.column_count()
            ))
            .into());
        }

        let mut report = CleanReport {
            rows_in: table.row_count(),
            ..CleanReport::default()
        };

        let columns = normalize_columns(table.columns());

        let rows: Vec<Vec<Cell>> = table
            .rows()
            .iter()
            .filter(|row| !row.iter().all(Cell::is_missing))
            .cloned()
            .collect();
        report.empty_rows_dropped = table.row_count() - rows.len();

        let (rows, dropped) = dedupe(rows);
        report.duplicates_dropped = dropped;

        let working = Table::new(columns, rows)?;
        let roles = ColumnRoles::infer(&working, &self.config.roles);
        report.roles = roles.named(working.columns());
        let (columns, mut rows) = working.into_parts();

        for idx in roles.indices(ColumnRole::Date) {
            let unparseable = parse_dates(&mut rows, idx);
            if unparseable > 0 {
                log::debug!("{} unparseable value(s) in '{}'", unparseable, columns[idx]);
                report
                    .unparseable_dates
                    .insert(columns[idx].clone(), unparseable);
            }
        }

        for idx in roles.indices(ColumnRole::Phone) {
            for row in rows.iter_mut() {
                row[idx] = normalize_phone(&row[idx], self.config.missing_phone);
            }
        }

        let text_columns = roles.indices(ColumnRole::Text);
        for &idx in &text_columns {
            trim_text(&mut rows, idx);
        }
        for &idx in &text_columns {
            report.unknown_filled += fill_unknown(&mut rows, idx);
        }

        let (rows, dropped) = dedupe(rows);
        report.late_duplicates_dropped = dropped;

        let cleaned = Table::new(columns, rows)?;
        report.rows_out = cleaned.row_count();
        report.row_count_mismatch = self.check_row_count(cleaned.row_count());

        log::info!(
            "Cleaned {} rows into {} ({} empty, {} duplicate, {} unknown filled)",
            report.rows_in,
            report.rows_out,
            report.empty_rows_dropped,
            report.duplicates_dropped + report.late_duplicates_dropped,
            report.unknown_filled
        );

        Ok((cleaned, report))
    }

    fn check_row_count(&self, actual: usize) -> Option<RowCountMismatch> {
        let expected = self.config.expected_rows?;
        if expected == actual {
            return None;
        }
        log::warn!(
            "Expected {} rows after cleaning, got {}. Investigate upstream raw data or adjust the cleaning rules.",
            expected,
            actual
        );
        Some(RowCountMismatch { expected, actual })
    }
}

impl Transformer for Cleaner {
    type Input = Table;
    type Output = Table;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.clean(&input)
    }
}

fn normalize_columns(columns: &[String]) -> Vec<String> {
    let normalized: Vec<String> = columns.iter().map(|c| normalize_column_name(c)).collect();

    let mut seen = HashSet::new();
    for name in &normalized {
        if !seen.insert(name) {
            log::warn!("Column name '{}' occurs more than once after normalization", name);
        }
    }
    normalized
}

/// Keep the first occurrence of each row, preserving order
fn dedupe(rows: Vec<Vec<Cell>>) -> (Vec<Vec<Cell>>, usize) {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(rows.len());
        rows.iter().map(|row| seen.insert(row)).collect()
    };
    let before = rows.len();
    let kept: Vec<Vec<Cell>> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Returns how many cells newly became unparseable
fn parse_dates(rows: &mut [Vec<Cell>], idx: usize) -> usize {
    let mut unparseable = 0;
    for row in rows.iter_mut() {
        let parsed = parse_date_cell(&row[idx]);
        if parsed == Cell::Unparseable && row[idx] != Cell::Unparseable {
            unparseable += 1;
        }
        row[idx] = parsed;
    }
    unparseable
}

fn trim_text(rows: &mut [Vec<Cell>], idx: usize) {
    for row in rows.iter_mut() {
        if let Cell::Text(s) = &mut row[idx] {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }
}

fn fill_unknown(rows: &mut [Vec<Cell>], idx: usize) -> usize {
    let mut filled = 0;
    for row in rows.iter_mut() {
        if row[idx].is_missing() {
            row[idx] = Cell::text(UNKNOWN);
            filled += 1;
        }
    }
    filled
}
