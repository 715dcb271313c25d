//! Loader trait for writing data to destinations

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// # Example
/// ```
/// use dim_users_etl::etl::Loader;
/// use dim_users_etl::table::Table;
/// use eyre::Result;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     type Input = Table;
///
///     fn load(&self, input: Self::Input) -> Result<usize> {
///         Ok(input.row_count())
///     }
/// }
/// ```
pub trait Loader {
    /// The type of data to load
    type Input;

    /// Load data to the destination
    ///
    /// Returns the number of rows written
    ///
    /// # Errors
    /// Returns an error if loading fails (empty input, conflicts, I/O, etc.)
    fn load(&self, input: Self::Input) -> Result<usize>;
}
