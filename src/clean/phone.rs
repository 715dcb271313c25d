//! Phone number normalization

use crate::table::Cell;
use serde::{Deserialize, Serialize};

/// What a missing phone cell becomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPhone {
    /// Stay missing
    #[default]
    Keep,
    /// Become an empty string
    Empty,
}

/// Keep only the ASCII digits of a phone value
///
/// ```
/// use dim_users_etl::clean::{normalize_phone, MissingPhone};
/// use dim_users_etl::table::Cell;
///
/// let cell = normalize_phone(&Cell::text("+1 (555) 123-4567"), MissingPhone::Keep);
/// assert_eq!(cell, Cell::text("15551234567"));
/// ```
pub fn normalize_phone(cell: &Cell, missing: MissingPhone) -> Cell {
    match cell.render() {
        Some(text) => Cell::Text(text.chars().filter(char::is_ascii_digit).collect()),
        None => match missing {
            MissingPhone::Keep => Cell::Null,
            MissingPhone::Empty => Cell::text(""),
        },
    }
}
