//! Keyword-to-category matching used when linking brokers to categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Extra lowercase needles searched for when a keyword is matched.
///
/// Keys are normalised to trimmed lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct KeywordSynonyms {
    table: BTreeMap<String, Vec<String>>,
}

impl KeywordSynonyms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, keyword: &str, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.table.entry(normalise(keyword)).or_default();
        for synonym in synonyms {
            let synonym = normalise(synonym.as_ref());
            if !synonym.is_empty() && !entry.contains(&synonym) {
                entry.push(synonym);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All substrings that count as a match for `keyword`: the keyword itself
    /// followed by its synonyms. Empty for a blank keyword.
    #[must_use]
    pub fn needles(&self, keyword: &str) -> Vec<String> {
        let keyword = normalise(keyword);
        if keyword.is_empty() {
            return Vec::new();
        }
        let mut needles = vec![keyword.clone()];
        if let Some(extra) = self.table.get(&keyword) {
            needles.extend(extra.iter().filter(|s| **s != keyword).cloned());
        }
        needles
    }
}

impl From<BTreeMap<String, Vec<String>>> for KeywordSynonyms {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut synonyms = Self::new();
        for (keyword, extra) in raw {
            synonyms.insert(&keyword, extra);
        }
        synonyms
    }
}

impl From<KeywordSynonyms> for BTreeMap<String, Vec<String>> {
    fn from(synonyms: KeywordSynonyms) -> Self {
        synonyms.table
    }
}

/// Find the category a broker keyword refers to.
///
/// A category matches when its lowercased name contains the lowercased keyword
/// or any synonym declared for it. Categories are scanned in slice order and
/// the first match wins.
///
/// A blank or whitespace-only keyword matches nothing. A literal substring
/// test would link it to whichever category comes first.
#[must_use]
pub fn match_category<'a>(
    keyword: &str,
    categories: &'a [Category],
    synonyms: &KeywordSynonyms,
) -> Option<&'a Category> {
    let needles = synonyms.needles(keyword);
    if needles.is_empty() {
        return None;
    }
    categories.iter().find(|category| {
        let name = category.name.to_lowercase();
        needles.iter().any(|needle| name.contains(needle.as_str()))
    })
}

fn normalise(s: &str) -> String {
    s.trim().to_lowercase()
}
