//! CLI helper functions

use crate::{
    clean::{CleanReport, Cleaner, CleaningConfig},
    config::{DatabaseCredentials, StoreSettings},
    etl::{Extractor, Pipeline},
    storage::{ConflictPolicy, DirectoryStore, TableStore, read_csv},
    tables::{TableExtractor, TableLoader},
};
use eyre::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Build cleaning rules from an optional rules file and CLI overrides
///
/// Without a rules file the `dim_users` preset is used. `expected_rows`
/// replaces the expectation from either source; `skip_row_check` removes it.
pub fn load_cleaning_config(
    rules: Option<&Path>,
    expected_rows: Option<usize>,
    skip_row_check: bool,
) -> Result<CleaningConfig> {
    let mut config = match rules {
        Some(path) => {
            log::info!("Loading cleaning rules from {}", path.display());
            CleaningConfig::from_yaml_file(path)?
        }
        None => CleaningConfig::dim_users(),
    };

    if expected_rows.is_some() {
        config.expected_rows = expected_rows;
    }
    if skip_row_check {
        config.expected_rows = None;
    }

    Ok(config)
}

/// Validate a credential file before anything touches the store
pub fn check_credentials(path: impl AsRef<Path>) -> Result<DatabaseCredentials> {
    let path = path.as_ref();
    log::info!("Reading credentials from {}", path.display());
    let creds = DatabaseCredentials::from_yaml_file(path)?;
    log::info!("Credentials valid for {}", creds.redacted_url());
    Ok(creds)
}

/// List the tables in a store
pub fn list_tables(store: impl AsRef<Path>) -> Result<BTreeSet<String>> {
    let store = DirectoryStore::open(store)?;
    store.list_tables()
}

/// Import a CSV file into a store as `table`
///
/// Returns the number of rows written
pub fn import_csv(
    store: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    table: &str,
    policy: ConflictPolicy,
) -> Result<usize> {
    let csv_path = csv_path.as_ref();
    let store = DirectoryStore::open(store)?;

    let data = read_csv(csv_path)?;
    log::info!(
        "Read {} rows x {} columns from {}",
        data.row_count(),
        data.column_count(),
        csv_path.display()
    );

    store
        .write_table(table, data, policy)
        .with_context(|| format!("Failed to import into '{}'", table))
}

/// Extract → Clean → Load
///
/// The store is opened for the duration of the run and released when this
/// function returns, whether or not the run succeeded.
pub fn run_pipeline(settings: &StoreSettings, config: CleaningConfig) -> Result<usize> {
    log::info!(
        "Cleaning '{}' into '{}' (policy: {})",
        settings.source_table,
        settings.target_table,
        settings.policy
    );

    let store = DirectoryStore::open(&settings.store)?;

    let extractor = TableExtractor::new(&store, &settings.source_table);
    let cleaner = Cleaner::new(config);
    let loader = TableLoader::new(&store, &settings.target_table, settings.policy);

    Pipeline::new(extractor, cleaner, loader).run()
}

/// Extract and clean without uploading, returning what cleaning would change
pub fn preview_pipeline(settings: &StoreSettings, config: CleaningConfig) -> Result<CleanReport> {
    let store = DirectoryStore::open(&settings.store)?;
    let raw = TableExtractor::new(&store, &settings.source_table).extract()?;
    let (_, report) = Cleaner::new(config).clean_with_report(&raw)?;
    Ok(report)
}
