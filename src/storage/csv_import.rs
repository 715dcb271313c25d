//! CSV import into a [`Table`]

use crate::clean::{is_date_like, is_phone_like, normalize_column_name};
use crate::table::{Cell, Table};
use eyre::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Numbers written with a leading `+` or a significant leading zero are
/// identifiers such as phone numbers, not quantities
fn looks_like_identifier(field: &str) -> bool {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some('+'), _) => true,
        (Some('0'), Some(c)) => c.is_ascii_digit(),
        _ => false,
    }
}

/// Type a raw CSV field
///
/// Empty fields are missing; integers, floats and booleans are recognised;
/// everything else stays text exactly as written, surrounding whitespace
/// included.
fn sniff(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Null;
    }
    if looks_like_identifier(field) {
        return Cell::text(field);
    }
    if let Ok(i) = field.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = field.parse::<f64>()
        && f.is_finite()
    {
        return Cell::Float(f);
    }
    match field {
        "true" => Cell::Boolean(true),
        "false" => Cell::Boolean(false),
        _ => Cell::text(field),
    }
}

/// Read CSV with a header row from any reader
pub fn read_csv_from(reader: impl Read) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    // Dates and phone numbers are parsed by the cleaner from their text
    let text_only: Vec<bool> = columns
        .iter()
        .map(|c| {
            let name = normalize_column_name(c);
            is_date_like(&name) || is_phone_like(&name)
        })
        .collect();

    let mut table = Table::with_columns(columns);
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", i + 1))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(idx, field)| match text_only.get(idx) {
                Some(true) if !field.is_empty() => Cell::text(field),
                _ => sniff(field),
            })
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

/// Read a CSV file with a header row
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("Failed to import {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff() {
        assert_eq!(sniff(""), Cell::Null);
        assert_eq!(sniff("42"), Cell::Integer(42));
        assert_eq!(sniff("4.5"), Cell::Float(4.5));
        assert_eq!(sniff("true"), Cell::Boolean(true));
        assert_eq!(sniff(" Ada "), Cell::text(" Ada "));
        assert_eq!(sniff("NaN"), Cell::text("NaN"));
        assert_eq!(sniff("+44 20 7946"), Cell::text("+44 20 7946"));
        assert_eq!(sniff("0"), Cell::Integer(0));
        assert_eq!(sniff("0.5"), Cell::Float(0.5));
    }

    #[test]
    fn test_sniff_keeps_leading_zeros_and_plus() {
        assert_eq!(sniff("0161"), Cell::text("0161"));
        assert_eq!(sniff("01614960674"), Cell::text("01614960674"));
        assert_eq!(sniff("+4915112345"), Cell::text("+4915112345"));
    }

    #[test]
    fn test_date_and_phone_columns_stay_text() {
        let data = "name,Phone Number,join_date,index\nAda,5551234,20200115,7\n,,,\n";
        let table = read_csv_from(data.as_bytes()).unwrap();

        assert_eq!(table.cell(0, "Phone Number"), Some(&Cell::text("5551234")));
        assert_eq!(table.cell(0, "join_date"), Some(&Cell::text("20200115")));
        assert_eq!(table.cell(0, "index"), Some(&Cell::Integer(7)));
        assert_eq!(table.cell(1, "join_date"), Some(&Cell::Null));
    }

    #[test]
    fn test_read_csv() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "index,First Name,phone_number\n0,Ada,\"+1 (555) 123-4567\"\n1,,\n"
        )
        .unwrap();

        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.columns(), ["index", "First Name", "phone_number"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.cell(0, "phone_number"),
            Some(&Cell::text("+1 (555) 123-4567"))
        );
        assert_eq!(table.cell(1, "First Name"), Some(&Cell::Null));
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let data = "a,b\n1,2\n3\n";
        assert!(read_csv_from(data.as_bytes()).is_err());
    }
}
