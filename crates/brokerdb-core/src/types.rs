use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned row identifier.
///
/// The hosted store may hand out integer keys or UUID strings depending on how
/// a table was created. The value is kept in whatever JSON shape it arrived in
/// and sent back unchanged in filters and join rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_owned())
    }
}

/// A row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
}

/// One broker entry of the import catalog.
///
/// Only `name` is required; it is the upsert key. Every other field falls back
/// to an empty string, zero, or an empty list when absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deposit: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fee: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regulations: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<String>,
    /// Free-text category keywords, e.g. `"forex"` or `"Stock Brokers"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

/// Treat an explicit null (`~`) like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BrokerRecord {
    /// A record with only a name; every other field takes its default.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: String::new(),
            rating: 0.0,
            deposit: 0.0,
            fee: 0.0,
            country: String::new(),
            regulations: String::new(),
            assets: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// The mutable column values written on both insert and update.
    #[must_use]
    pub fn fields(&self) -> BrokerFields {
        BrokerFields {
            logo_url: self.logo.clone(),
            rating: self.rating,
            min_deposit: self.deposit,
            trading_fee: self.fee,
            country: self.country.clone(),
            regulations: self.regulations.clone(),
            supported_assets: self.assets.clone(),
        }
    }
}

/// Mutable columns of the `brokers` table, named as the store names them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerFields {
    pub logo_url: String,
    pub rating: f64,
    pub min_deposit: f64,
    pub trading_fee: f64,
    pub country: String,
    pub regulations: String,
    pub supported_assets: Vec<String>,
}
