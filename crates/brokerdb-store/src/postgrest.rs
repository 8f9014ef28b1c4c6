//! [`CatalogStore`] over a PostgREST endpoint (the REST layer of a hosted
//! Supabase project).
//!
//! Every request carries the access key twice, as the `apikey` header and as a
//! bearer token. Non-2xx responses are decoded from PostgREST's error envelope
//! (`{code, message, details, hint}`) into [`StoreError::Api`].

use std::time::Duration;

use async_trait::async_trait;
use brokerdb_core::{BrokerFields, Category, RecordId};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::CatalogStore;

const REST_PREFIX: &str = "rest/v1/";

const CATEGORIES: &str = "categories";
const BROKERS: &str = "brokers";
const BROKER_CATEGORIES: &str = "broker_categories";

/// HTTP client for the store's REST interface.
///
/// Build one per process with [`PostgrestStore::new`] and pass it by
/// reference to every pipeline call.
pub struct PostgrestStore {
    client: Client,
    rest_root: Url,
    access_key: String,
}

impl std::fmt::Debug for PostgrestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestStore")
            .field("rest_root", &self.rest_root.as_str())
            .field("access_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: RecordId,
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    category_id: RecordId,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewCategory<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct NewBroker<'a> {
    name: &'a str,
    #[serde(flatten)]
    fields: &'a BrokerFields,
}

#[derive(Debug, Serialize)]
struct NewLink<'a> {
    broker_id: &'a RecordId,
    category_id: &'a RecordId,
}

impl PostgrestStore {
    /// Creates a client for the store at `store_url`.
    ///
    /// `store_url` is the project root (e.g. `https://abc.supabase.co`); a URL
    /// that already ends in `/rest/v1` is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidStoreUrl`] if `store_url` is not an
    /// absolute `http`/`https` URL, or [`StoreError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        store_url: &str,
        access_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StoreError> {
        let rest_root = rest_root(store_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            rest_root,
            access_key: access_key.to_owned(),
        })
    }

    /// The `/rest/v1/` URL all table paths are resolved against.
    #[must_use]
    pub fn rest_root(&self) -> &Url {
        &self.rest_root
    }

    /// Builds `<rest_root>/<table>?<params>` with percent-encoded parameters.
    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.rest_root.clone();
        // rest_root is validated as a base URL, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(table);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
    }

    /// Sends the request and decodes a 2xx JSON body as `T`.
    async fn fetch_json<T: DeserializeOwned>(
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), context, "store request rejected");
            return Err(api_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends the request and discards a 2xx body.
    async fn execute(request: RequestBuilder) -> Result<(), StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), "store write rejected");
        Err(api_error(status, &body))
    }
}

#[async_trait]
impl CatalogStore for PostgrestStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let url = self.table_url(CATEGORIES, &[("select", "id,name"), ("order", "id.asc")]);
        Self::fetch_json(self.request(Method::GET, url), "list categories").await
    }

    async fn insert_category(&self, name: &str) -> Result<Category, StoreError> {
        let url = self.table_url(CATEGORIES, &[("select", "id,name")]);
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&NewCategory { name });
        let context = format!("insert category '{name}'");
        let rows: Vec<Category> = Self::fetch_json(request, &context).await?;
        single_row(rows, &context)
    }

    async fn find_broker_id(&self, name: &str) -> Result<Option<RecordId>, StoreError> {
        let filter = format!("eq.{name}");
        let url = self.table_url(BROKERS, &[("select", "id"), ("name", &filter)]);
        let context = format!("find broker '{name}'");
        let rows: Vec<IdRow> = Self::fetch_json(self.request(Method::GET, url), &context).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.into_iter().next().map(|row| row.id)),
            count => Err(StoreError::UnexpectedRowCount { context, count }),
        }
    }

    async fn update_broker(
        &self,
        id: &RecordId,
        fields: &BrokerFields,
    ) -> Result<(), StoreError> {
        let filter = format!("eq.{id}");
        let url = self.table_url(BROKERS, &[("id", &filter)]);
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(fields);
        Self::execute(request).await
    }

    async fn insert_broker(
        &self,
        name: &str,
        fields: &BrokerFields,
    ) -> Result<RecordId, StoreError> {
        let url = self.table_url(BROKERS, &[("select", "id")]);
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&NewBroker { name, fields });
        let context = format!("insert broker '{name}'");
        let rows: Vec<IdRow> = Self::fetch_json(request, &context).await?;
        single_row(rows, &context).map(|row| row.id)
    }

    async fn linked_category_ids(
        &self,
        broker_id: &RecordId,
    ) -> Result<Vec<RecordId>, StoreError> {
        let filter = format!("eq.{broker_id}");
        let url = self.table_url(
            BROKER_CATEGORIES,
            &[("select", "category_id"), ("broker_id", &filter)],
        );
        let context = format!("list links for broker {broker_id}");
        let rows: Vec<LinkRow> = Self::fetch_json(self.request(Method::GET, url), &context).await?;
        Ok(rows.into_iter().map(|row| row.category_id).collect())
    }

    async fn insert_link(
        &self,
        broker_id: &RecordId,
        category_id: &RecordId,
    ) -> Result<(), StoreError> {
        let url = self.table_url(BROKER_CATEGORIES, &[]);
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(&NewLink {
                broker_id,
                category_id,
            });
        Self::execute(request).await
    }
}

/// Resolve the `/rest/v1/` root from a user-supplied store URL.
fn rest_root(store_url: &str) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidStoreUrl {
        url: store_url.to_owned(),
        reason,
    };

    // Normalise: exactly one trailing slash so `join` appends rather than
    // replacing the last path segment.
    let normalised = format!("{}/", store_url.trim().trim_end_matches('/'));
    let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
        return Err(invalid("expected an http(s) URL".to_string()));
    }

    if base.path().ends_with("/rest/v1/") {
        return Ok(base);
    }
    base.join(REST_PREFIX).map_err(|e| invalid(e.to_string()))
}

fn single_row<T>(rows: Vec<T>, context: &str) -> Result<T, StoreError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        _ => Err(StoreError::UnexpectedRowCount {
            context: context.to_owned(),
            count,
        }),
    }
}

/// Decode a PostgREST error envelope; fall back to the raw body or the
/// status reason when the body is not the expected JSON.
fn api_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = match (parsed.message, parsed.details) {
        (Some(message), Some(details)) if !details.is_empty() => format!("{message} ({details})"),
        (Some(message), _) => message,
        (None, _) if !body.trim().is_empty() => body.trim().to_owned(),
        (None, _) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    };
    StoreError::Api {
        status: status.as_u16(),
        code: parsed.code,
        message,
    }
}

#[cfg(test)]
#[path = "postgrest_test.rs"]
mod tests;
