use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::matching::KeywordSynonyms;
use crate::types::BrokerRecord;
use crate::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("../../../config/brokers.yaml");

/// Everything one import run needs besides the store: the canonical category
/// names, the keyword synonym table, and the brokers in import order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<String>,
    #[serde(default)]
    pub synonyms: KeywordSynonyms,
    pub brokers: Vec<BrokerRecord>,
}

/// The catalog compiled into the binary from `config/brokers.yaml`.
///
/// # Errors
///
/// Returns `ConfigError` if the embedded document fails to parse or validate.
pub fn builtin_catalog() -> Result<Catalog, ConfigError> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Load, validate, and merge a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse a catalog document, validate it, and merge duplicate broker entries.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, ConfigError> {
    let mut catalog: Catalog = serde_yaml::from_str(yaml)?;
    validate_catalog(&catalog)?;
    catalog.brokers = merge_duplicate_brokers(std::mem::take(&mut catalog.brokers));
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    if catalog.categories.is_empty() {
        return Err(ConfigError::Validation(
            "canonical category list must be non-empty".to_string(),
        ));
    }

    let mut seen_categories = HashSet::new();
    for name in &catalog.categories {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen_categories.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{name}'"
            )));
        }
    }

    for broker in &catalog.brokers {
        if broker.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "broker name must be non-empty".to_string(),
            ));
        }

        for (field, value) in [
            ("rating", broker.rating),
            ("deposit", broker.deposit),
            ("fee", broker.fee),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "broker '{}' has invalid {field} {value}; must be a non-negative number",
                    broker.name
                )));
            }
        }
    }

    Ok(())
}

/// Collapse entries that share a name. The first entry keeps its position and
/// field values; later entries only contribute category keywords it lacks.
fn merge_duplicate_brokers(brokers: Vec<BrokerRecord>) -> Vec<BrokerRecord> {
    let mut merged: Vec<BrokerRecord> = Vec::with_capacity(brokers.len());
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for broker in brokers {
        if let Some(&idx) = index_by_name.get(&broker.name) {
            let existing = &mut merged[idx];
            for keyword in broker.categories {
                if !existing.categories.contains(&keyword) {
                    existing.categories.push(keyword);
                }
            }
        } else {
            index_by_name.insert(broker.name.clone(), merged.len());
            merged.push(broker);
        }
    }

    merged
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
