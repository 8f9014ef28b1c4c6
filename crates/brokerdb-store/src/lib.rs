//! Access to the hosted store that backs the broker catalog.
//!
//! [`CatalogStore`] is the seam the import pipeline is written against;
//! [`PostgrestStore`] implements it over the store's REST interface.

pub mod error;
pub mod postgrest;
pub mod store;

pub use error::{StoreError, UNIQUE_VIOLATION};
pub use postgrest::PostgrestStore;
pub use store::CatalogStore;
