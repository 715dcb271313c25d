//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming extracted data
///
/// Implementors define how to transform data:
/// - Data cleaning (normalizing, deduplicating)
/// - Format conversion
/// - Validation
///
/// # Example
/// ```
/// use dim_users_etl::etl::Transformer;
/// use dim_users_etl::table::Table;
/// use eyre::Result;
///
/// struct ColumnUppercaser;
///
/// impl Transformer for ColumnUppercaser {
///     type Input = Table;
///     type Output = Table;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         let (columns, rows) = input.into_parts();
///         Table::new(columns.iter().map(|c| c.to_uppercase()).collect(), rows)
///     }
/// }
/// ```
pub trait Transformer {
    /// Input type
    type Input;

    /// Output type after transformation
    type Output;

    /// Transform the input
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, empty input, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}
