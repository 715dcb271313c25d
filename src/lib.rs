//! dim_users ETL
//!
//! Extracts the raw user table from a table store, cleans it into the
//! `dim_users` shape and uploads the result.

pub mod clean;
pub mod cli;
pub mod config;
pub mod error;
pub mod etl;
pub mod storage;
pub mod table;
pub mod tables;

// Re-exports for convenience
pub use clean::{CleanReport, Cleaner, CleaningConfig};
pub use error::EtlError;
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use storage::{ConflictPolicy, DirectoryStore, MemoryStore, TableStore};
pub use table::{Cell, Table};
pub use tables::{TableExtractor, TableLoader};
