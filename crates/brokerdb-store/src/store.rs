use async_trait::async_trait;
use brokerdb_core::{BrokerFields, Category, RecordId};

use crate::error::StoreError;

/// The queries the import pipeline issues against the `categories`,
/// `brokers`, and `broker_categories` tables.
///
/// Implementations perform each call to completion before returning; the
/// pipeline never issues two calls at once.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All rows of `categories`, in the store's stable order.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Insert one category and return the created row.
    async fn insert_category(&self, name: &str) -> Result<Category, StoreError>;

    /// Id of the broker whose `name` equals `name` exactly, if any.
    async fn find_broker_id(&self, name: &str) -> Result<Option<RecordId>, StoreError>;

    /// Overwrite the mutable columns of an existing broker.
    async fn update_broker(&self, id: &RecordId, fields: &BrokerFields)
        -> Result<(), StoreError>;

    /// Insert a new broker and return its assigned id.
    async fn insert_broker(&self, name: &str, fields: &BrokerFields)
        -> Result<RecordId, StoreError>;

    /// Category ids already linked to `broker_id`.
    async fn linked_category_ids(&self, broker_id: &RecordId)
        -> Result<Vec<RecordId>, StoreError>;

    /// Insert one `broker_categories` row.
    async fn insert_link(
        &self,
        broker_id: &RecordId,
        category_id: &RecordId,
    ) -> Result<(), StoreError>;
}
