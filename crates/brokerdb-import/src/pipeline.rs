//! Sequential import of a broker catalog.
//!
//! Brokers are processed one at a time in catalog order. A failure for one
//! broker is logged and counted, never propagated, so a single bad row does
//! not abort the batch. Only the category bootstrap is fatal.

use brokerdb_core::{match_category, BrokerRecord, Catalog, Category, RecordId};
use brokerdb_store::CatalogStore;

use crate::bootstrap::ensure_categories;
use crate::linking::link_broker_categories;
use crate::summary::ImportSummary;
use crate::ImportError;

/// Which branch of the upsert a broker took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Inserted,
    Updated,
}

/// Run the full import: bootstrap categories, then upsert and link every
/// broker in `catalog`.
///
/// # Errors
///
/// Returns [`ImportError::Bootstrap`] if the category table cannot be read or
/// seeded. Per-broker failures are reflected in the returned summary instead.
pub async fn run_import<S>(store: &S, catalog: &Catalog) -> Result<ImportSummary, ImportError>
where
    S: CatalogStore + ?Sized,
{
    let category_set = ensure_categories(store, &catalog.categories).await?;
    let categories = category_set.categories;

    let mut summary = ImportSummary {
        categories_found: categories.len(),
        categories_created: category_set.created,
        brokers_prepared: catalog.brokers.len(),
        ..ImportSummary::default()
    };

    tracing::info!(
        categories = summary.categories_found,
        brokers = summary.brokers_prepared,
        "prepared brokers for import"
    );

    for broker in &catalog.brokers {
        let (broker_id, action) = match upsert_broker(store, broker).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(broker = %broker.name, error = %e, "failed to upsert broker");
                summary.brokers_failed += 1;
                continue;
            }
        };

        match action {
            UpsertAction::Inserted => {
                summary.brokers_imported += 1;
                tracing::info!(broker = %broker.name, id = %broker_id, "imported broker");
            }
            UpsertAction::Updated => {
                summary.brokers_updated += 1;
                tracing::info!(broker = %broker.name, id = %broker_id, "broker already exists, updated");
            }
        }

        match link_broker_categories(
            store,
            &broker.name,
            &broker_id,
            &broker.categories,
            &categories,
            &catalog.synonyms,
        )
        .await
        {
            Ok(outcome) => summary.record_links(outcome),
            Err(e) => {
                tracing::error!(
                    broker = %broker.name,
                    error = %e,
                    "failed to read existing category links"
                );
                summary.link_errors += 1;
            }
        }
    }

    if summary.brokers_failed > 0 || summary.link_errors > 0 {
        tracing::warn!(
            failed_brokers = summary.brokers_failed,
            link_errors = summary.link_errors,
            total_brokers = summary.brokers_prepared,
            "some brokers were not fully imported; re-running is safe"
        );
    }

    tracing::info!(imported = summary.brokers_imported, "import finished");
    Ok(summary)
}

/// Insert or update one broker keyed by its exact name.
///
/// # Errors
///
/// Returns [`ImportError::Broker`] if the lookup, insert, or update fails.
pub async fn upsert_broker<S>(
    store: &S,
    broker: &BrokerRecord,
) -> Result<(RecordId, UpsertAction), ImportError>
where
    S: CatalogStore + ?Sized,
{
    let wrap = |source| ImportError::Broker {
        broker: broker.name.clone(),
        source,
    };

    let fields = broker.fields();
    match store.find_broker_id(&broker.name).await.map_err(wrap)? {
        Some(id) => {
            store.update_broker(&id, &fields).await.map_err(wrap)?;
            Ok((id, UpsertAction::Updated))
        }
        None => {
            let id = store
                .insert_broker(&broker.name, &fields)
                .await
                .map_err(wrap)?;
            Ok((id, UpsertAction::Inserted))
        }
    }
}

/// What a dry run would link for one broker, matched against the catalog's
/// canonical category names rather than the live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerPreview {
    pub name: String,
    pub categories: Vec<String>,
    pub unmatched_keywords: Vec<String>,
}

/// Resolve every broker's keywords offline, without touching a store.
#[must_use]
pub fn preview_import(catalog: &Catalog) -> Vec<BrokerPreview> {
    let canonical: Vec<Category> = catalog
        .categories
        .iter()
        .zip(1_i64..)
        .map(|(name, idx)| Category {
            id: RecordId::Int(idx),
            name: name.clone(),
        })
        .collect();

    catalog
        .brokers
        .iter()
        .map(|broker| {
            let mut categories = Vec::new();
            let mut unmatched_keywords = Vec::new();
            for keyword in &broker.categories {
                match match_category(keyword, &canonical, &catalog.synonyms) {
                    Some(category) if !categories.contains(&category.name) => {
                        categories.push(category.name.clone());
                    }
                    Some(_) => {}
                    None => unmatched_keywords.push(keyword.clone()),
                }
            }
            BrokerPreview {
                name: broker.name.clone(),
                categories,
                unmatched_keywords,
            }
        })
        .collect()
}
