//! Runtime configuration
//!
//! - [`DatabaseCredentials`]: the YAML credential file for the database
//! - [`StoreSettings`]: which store and tables a run uses, from the environment

mod credentials;
mod settings;

pub use credentials::DatabaseCredentials;
pub use settings::{
    DEFAULT_SOURCE_TABLE, DEFAULT_TARGET_TABLE, ENV_CONFLICT_POLICY, ENV_SOURCE_TABLE, ENV_STORE,
    ENV_TARGET_TABLE, StoreSettings,
};
