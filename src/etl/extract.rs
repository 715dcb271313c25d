//! Extractor trait for pulling data out of a source

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to read from sources like:
/// - A table store
/// - Files on disk
///
/// # Example
/// ```
/// use dim_users_etl::etl::Extractor;
/// use dim_users_etl::table::{Cell, Table};
/// use eyre::Result;
///
/// struct FixedExtractor;
///
/// impl Extractor for FixedExtractor {
///     type Output = Table;
///
///     fn extract(&self) -> Result<Self::Output> {
///         Table::new(vec!["id".into()], vec![vec![Cell::Integer(1)]])
///     }
/// }
///
/// assert_eq!(FixedExtractor.extract().unwrap().row_count(), 1);
/// ```
pub trait Extractor {
    /// The type of data extracted
    type Output;

    /// Extract data from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (missing table, I/O, parsing, etc.)
    fn extract(&self) -> Result<Self::Output>;
}
