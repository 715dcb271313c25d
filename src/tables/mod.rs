//! Store-backed extraction and loading
//!
//! [`TableExtractor`] and [`TableLoader`] adapt any [`TableStore`](crate::storage::TableStore)
//! to the ETL traits, so a run is
//! `TableExtractor` → [`Cleaner`](crate::clean::Cleaner) → `TableLoader`.

mod extractor;
mod loader;

pub use extractor::TableExtractor;
pub use loader::TableLoader;
