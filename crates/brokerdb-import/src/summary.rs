use crate::linking::LinkOutcome;

/// Counters reported at the end of an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories_found: usize,
    pub categories_created: usize,
    pub brokers_prepared: usize,
    /// Brokers inserted by this run. Updates of existing rows are not counted.
    pub brokers_imported: usize,
    pub brokers_updated: usize,
    pub brokers_failed: usize,
    pub links_created: usize,
    pub links_existing: usize,
    pub keywords_unmatched: usize,
    /// Failed link inserts plus brokers whose existing links could not be read.
    pub link_errors: usize,
}

impl ImportSummary {
    pub(crate) fn record_links(&mut self, outcome: LinkOutcome) {
        self.links_created += outcome.created;
        self.links_existing += outcome.already_linked;
        self.keywords_unmatched += outcome.unmatched;
        self.link_errors += outcome.failed;
    }

    /// `true` when every broker and every link was written without error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.brokers_failed == 0 && self.link_errors == 0
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "categories={} (created {}) brokers={} imported={} updated={} failed={} \
             links_created={} links_existing={} unmatched_keywords={} link_errors={}",
            self.categories_found,
            self.categories_created,
            self.brokers_prepared,
            self.brokers_imported,
            self.brokers_updated,
            self.brokers_failed,
            self.links_created,
            self.links_existing,
            self.keywords_unmatched,
            self.link_errors,
        )
    }
}
