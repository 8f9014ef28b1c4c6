use brokerdb_core::{match_category, Category, KeywordSynonyms, RecordId};
use brokerdb_store::{CatalogStore, StoreError};

/// Per-broker tally of what happened to each category keyword.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkOutcome {
    /// New `broker_categories` rows written.
    pub created: usize,
    /// Keywords whose category was already linked, including duplicate-key
    /// rejections from the store.
    pub already_linked: usize,
    /// Keywords that matched no category.
    pub unmatched: usize,
    /// Link inserts that failed for any other reason.
    pub failed: usize,
}

/// Link a broker to the categories its keywords refer to.
///
/// Existing links are read once up front and consulted before every insert,
/// so re-running with the same keywords writes nothing. Insert failures are
/// logged per keyword and do not stop the remaining keywords; a duplicate-key
/// rejection counts as already linked.
///
/// # Errors
///
/// Returns the [`StoreError`] from reading the broker's existing links. No
/// link is attempted in that case.
pub async fn link_broker_categories<S>(
    store: &S,
    broker_name: &str,
    broker_id: &RecordId,
    keywords: &[String],
    categories: &[Category],
    synonyms: &KeywordSynonyms,
) -> Result<LinkOutcome, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let mut linked = store.linked_category_ids(broker_id).await?;
    let mut outcome = LinkOutcome::default();

    for keyword in keywords {
        let Some(category) = match_category(keyword, categories, synonyms) else {
            tracing::debug!(broker = %broker_name, keyword = %keyword, "no category matches keyword");
            outcome.unmatched += 1;
            continue;
        };

        if linked.contains(&category.id) {
            outcome.already_linked += 1;
            continue;
        }

        match store.insert_link(broker_id, &category.id).await {
            Ok(()) => {
                tracing::debug!(broker = %broker_name, category = %category.name, "linked category");
                linked.push(category.id.clone());
                outcome.created += 1;
            }
            Err(e) if e.is_unique_violation() => {
                linked.push(category.id.clone());
                outcome.already_linked += 1;
            }
            Err(e) => {
                tracing::error!(
                    broker = %broker_name,
                    category = %category.name,
                    error = %e,
                    "failed to link broker to category"
                );
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}
