//! Structured error kinds for the ETL pipeline
//!
//! Functions return `eyre::Result`; these variants are what callers
//! `downcast_ref` to when they need to tell a structural failure apart.

/// Structural failures that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("Empty input: {context}")]
    EmptyInput { context: String },

    #[error("Table '{name}' does not exist in the store")]
    TableNotFound { name: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Table '{name}' already exists and the conflict policy is 'fail'")]
    TableExists { name: String },

    #[error("Cannot append to '{name}': expected columns {expected:?}, got {actual:?}")]
    SchemaMismatch {
        name: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid table name '{name}': only letters, digits and '_' are allowed")]
    InvalidTableName { name: String },

    #[error("Row {row} has {actual} cells but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl EtlError {
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound { name: name.into() }
    }
}
