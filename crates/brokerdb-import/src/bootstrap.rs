use brokerdb_core::Category;
use brokerdb_store::CatalogStore;

use crate::ImportError;

/// Category rows available for linking, plus how many this run created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    pub categories: Vec<Category>,
    pub created: usize,
}

/// Make sure the category table is seeded before brokers are linked.
///
/// If the table already holds any rows they are returned untouched, even when
/// names from `canonical` are missing; partial sets are not reconciled.
/// Otherwise every canonical name is inserted one at a time, in order.
///
/// # Errors
///
/// Returns [`ImportError::Bootstrap`] if listing categories or inserting any
/// one of them fails. Rows inserted before the failure are left in place.
pub async fn ensure_categories<S>(
    store: &S,
    canonical: &[String],
) -> Result<CategorySet, ImportError>
where
    S: CatalogStore + ?Sized,
{
    let existing = store
        .list_categories()
        .await
        .map_err(ImportError::Bootstrap)?;

    if !existing.is_empty() {
        tracing::info!(count = existing.len(), "found existing categories");
        return Ok(CategorySet {
            categories: existing,
            created: 0,
        });
    }

    let mut categories = Vec::with_capacity(canonical.len());
    for name in canonical {
        let category = store
            .insert_category(name)
            .await
            .map_err(ImportError::Bootstrap)?;
        tracing::debug!(category = %category.name, id = %category.id, "created category");
        categories.push(category);
    }

    tracing::info!(count = categories.len(), "seeded canonical categories");
    let created = categories.len();
    Ok(CategorySet {
        categories,
        created,
    })
}
