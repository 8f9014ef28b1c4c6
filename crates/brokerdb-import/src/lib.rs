//! The broker import pipeline: category bootstrap, broker upsert, and
//! category linking, run sequentially against any [`CatalogStore`].
//!
//! [`CatalogStore`]: brokerdb_store::CatalogStore

use brokerdb_store::StoreError;
use thiserror::Error;

pub mod bootstrap;
pub mod linking;
pub mod pipeline;
pub mod summary;

pub use bootstrap::{ensure_categories, CategorySet};
pub use linking::{link_broker_categories, LinkOutcome};
pub use pipeline::{preview_import, run_import, upsert_broker, BrokerPreview, UpsertAction};
pub use summary::ImportSummary;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Reading or seeding the category table failed; the run cannot continue.
    #[error("category bootstrap failed: {0}")]
    Bootstrap(#[source] StoreError),

    /// A single broker could not be looked up, inserted, or updated.
    #[error("broker '{broker}': {source}")]
    Broker {
        broker: String,
        #[source]
        source: StoreError,
    },
}
