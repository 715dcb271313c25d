//! Column naming and role classification
//!
//! Every column gets exactly one [`ColumnRole`], decided once per cleaning
//! run from its normalized name and its values. Explicit overrides from the
//! cleaning rules take precedence over the name heuristics.

use crate::table::{Cell, Table};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const DATE_MARKERS: [&str; 3] = ["date", "dob", "joined"];

/// How the cleaner treats a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Parsed into timestamps
    Date,
    /// Reduced to digits
    Phone,
    /// Free-form text: trimmed and filled
    Text,
    /// Numbers, booleans and anything else left as stored
    Other,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Phone => write!(f, "phone"),
            Self::Text => write!(f, "text"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Trim, lowercase, then collapse each whitespace run into `_`
///
/// ```
/// use dim_users_etl::clean::normalize_column_name;
///
/// assert_eq!(normalize_column_name(" First  Name "), "first_name");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&name.trim().to_lowercase(), "_")
        .into_owned()
}

pub fn is_date_like(name: &str) -> bool {
    DATE_MARKERS.iter().any(|marker| name.contains(marker))
}

pub fn is_phone_like(name: &str) -> bool {
    name.starts_with("phone") || name.ends_with("phone") || name.contains("mobile")
}

/// A column holds free-form text when no cell is already a parsed date and
/// it either has some text or nothing at all.
fn holds_text<'a>(cells: impl Iterator<Item = &'a Cell>) -> bool {
    let mut any_text = false;
    let mut any_present = false;
    for cell in cells {
        match cell {
            Cell::Timestamp(_) | Cell::Unparseable => return false,
            Cell::Text(_) => any_text = true,
            c if !c.is_missing() => any_present = true,
            _ => {}
        }
    }
    any_text || !any_present
}

/// Role of every column, by position
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRoles {
    roles: Vec<ColumnRole>,
}

impl ColumnRoles {
    /// Classify the columns of a table whose names are already normalized
    ///
    /// Precedence: override, then date-like name, phone-like name,
    /// textual values, other.
    pub fn infer(table: &Table, overrides: &BTreeMap<String, ColumnRole>) -> Self {
        let overrides: BTreeMap<String, ColumnRole> = overrides
            .iter()
            .map(|(name, role)| (normalize_column_name(name), *role))
            .collect();

        let roles = table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if let Some(role) = overrides.get(name) {
                    *role
                } else if is_date_like(name) {
                    ColumnRole::Date
                } else if is_phone_like(name) {
                    ColumnRole::Phone
                } else if holds_text(table.rows().iter().map(|row| &row[idx])) {
                    ColumnRole::Text
                } else {
                    ColumnRole::Other
                }
            })
            .collect();

        Self { roles }
    }

    pub fn role(&self, idx: usize) -> Option<ColumnRole> {
        self.roles.get(idx).copied()
    }

    /// Positions of every column with the given role
    pub fn indices(&self, role: ColumnRole) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == role)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Pair each column name with its role
    pub fn named(&self, columns: &[String]) -> Vec<(String, ColumnRole)> {
        columns.iter().cloned().zip(self.roles.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name(" First  Name "), "first_name");
        assert_eq!(normalize_column_name("Date\tOf\nBirth"), "date_of_birth");
        assert_eq!(normalize_column_name("already_clean"), "already_clean");
        assert_eq!(normalize_column_name("EMAIL"), "email");
    }

    #[test]
    fn test_name_heuristics() {
        assert!(is_date_like("join_date"));
        assert!(is_date_like("dob"));
        assert!(is_date_like("joined"));
        assert!(!is_date_like("first_name"));

        assert!(is_phone_like("phone_number"));
        assert!(is_phone_like("home_phone"));
        assert!(is_phone_like("mobile_number"));
        assert!(!is_phone_like("telephony_id"));
    }

    #[test]
    fn test_infer_roles() {
        let table = Table::new(
            vec![
                "date_of_birth".into(),
                "phone_number".into(),
                "first_name".into(),
                "index".into(),
                "notes".into(),
            ],
            vec![
                vec![
                    Cell::text("1990-01-01"),
                    Cell::text("555"),
                    Cell::text("Ada"),
                    Cell::Integer(0),
                    Cell::Null,
                ],
                vec![
                    Cell::Null,
                    Cell::Integer(555),
                    Cell::Null,
                    Cell::Integer(1),
                    Cell::Null,
                ],
            ],
        )
        .unwrap();

        let roles = ColumnRoles::infer(&table, &BTreeMap::new());

        assert_eq!(roles.role(0), Some(ColumnRole::Date));
        assert_eq!(roles.role(1), Some(ColumnRole::Phone));
        assert_eq!(roles.role(2), Some(ColumnRole::Text));
        assert_eq!(roles.role(3), Some(ColumnRole::Other));
        // Entirely missing columns count as text
        assert_eq!(roles.role(4), Some(ColumnRole::Text));
        assert_eq!(roles.indices(ColumnRole::Text), vec![2, 4]);
    }

    #[test]
    fn test_parsed_dates_are_not_text() {
        let table = Table::new(
            vec!["last_seen".into()],
            vec![vec![Cell::Unparseable], vec![Cell::text("x")]],
        )
        .unwrap();

        let roles = ColumnRoles::infer(&table, &BTreeMap::new());
        assert_eq!(roles.role(0), Some(ColumnRole::Other));
    }

    #[test]
    fn test_overrides_win() {
        let table = Table::new(
            vec!["update_mode".into(), "index".into()],
            vec![vec![Cell::text("auto"), Cell::Integer(1)]],
        )
        .unwrap();

        let overrides = BTreeMap::from([("Update Mode".to_string(), ColumnRole::Text)]);
        let roles = ColumnRoles::infer(&table, &overrides);

        assert_eq!(roles.role(0), Some(ColumnRole::Text));
        assert_eq!(
            roles.named(table.columns()),
            vec![
                ("update_mode".to_string(), ColumnRole::Text),
                ("index".to_string(), ColumnRole::Other),
            ]
        );
    }
}
