//! Domain model, broker catalog, and configuration for the broker import pipeline.

use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod matching;
pub mod types;

pub use app_config::ImportConfig;
pub use catalog::{builtin_catalog, load_catalog, parse_catalog, Catalog};
pub use config::{load_import_config, load_import_config_from_env};
pub use matching::{match_category, KeywordSynonyms};
pub use types::{BrokerFields, BrokerRecord, Category, RecordId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
