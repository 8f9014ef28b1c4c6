//! In-memory `CatalogStore` with failure injection for pipeline tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use brokerdb_core::{BrokerFields, Category, RecordId};
use brokerdb_store::{CatalogStore, StoreError, UNIQUE_VIOLATION};

#[derive(Debug, Clone)]
pub struct StoredBroker {
    pub id: RecordId,
    pub name: String,
    pub fields: BrokerFields,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    categories: Vec<Category>,
    brokers: Vec<StoredBroker>,
    links: Vec<(RecordId, RecordId)>,
    fail_category: Option<String>,
    fail_lookups: HashSet<String>,
    fail_inserts: HashSet<String>,
    fail_updates: HashSet<String>,
    fail_link_lookup: bool,
    fail_links: bool,
    duplicate_on_link: bool,
    category_inserts: usize,
    broker_inserts: usize,
    broker_updates: usize,
    link_inserts: usize,
}

impl State {
    fn next_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::Int(self.next_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn api_error(status: u16, code: Option<&str>, message: &str) -> StoreError {
    StoreError::Api {
        status,
        code: code.map(str::to_string),
        message: message.to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(names: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            for name in names {
                let id = state.next_id();
                state.categories.push(Category {
                    id,
                    name: (*name).to_string(),
                });
            }
        }
        store
    }

    pub fn fail_category_insert(&self, name: &str) {
        self.state.lock().unwrap().fail_category = Some(name.to_string());
    }

    /// Name lookups for `name` return a 500.
    pub fn fail_broker_lookup(&self, name: &str) {
        self.state.lock().unwrap().fail_lookups.insert(name.to_string());
    }

    /// Inserting a broker called `name` returns a 500; the lookup still works.
    pub fn fail_broker_insert(&self, name: &str) {
        self.state.lock().unwrap().fail_inserts.insert(name.to_string());
    }

    /// Updating the stored broker called `name` returns a 500.
    pub fn fail_broker_update(&self, name: &str) {
        self.state.lock().unwrap().fail_updates.insert(name.to_string());
    }

    pub fn fail_link_lookup(&self) {
        self.state.lock().unwrap().fail_link_lookup = true;
    }

    pub fn fail_link_inserts(&self) {
        self.state.lock().unwrap().fail_links = true;
    }

    /// Link inserts write the row but answer with a duplicate-key error, as
    /// if a concurrent writer got there first.
    pub fn report_duplicate_links(&self) {
        self.state.lock().unwrap().duplicate_on_link = true;
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn brokers(&self) -> Vec<StoredBroker> {
        self.state.lock().unwrap().brokers.clone()
    }

    pub fn broker(&self, name: &str) -> Option<StoredBroker> {
        self.brokers().into_iter().find(|b| b.name == name)
    }

    pub fn links(&self) -> Vec<(RecordId, RecordId)> {
        self.state.lock().unwrap().links.clone()
    }

    /// Category names linked to the broker called `name`, in insert order.
    pub fn linked_names(&self, name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let Some(broker) = state.brokers.iter().find(|b| b.name == name) else {
            return Vec::new();
        };
        state
            .links
            .iter()
            .filter(|(broker_id, _)| *broker_id == broker.id)
            .filter_map(|(_, category_id)| {
                state
                    .categories
                    .iter()
                    .find(|c| c.id == *category_id)
                    .map(|c| c.name.clone())
            })
            .collect()
    }

    pub fn category_inserts(&self) -> usize {
        self.state.lock().unwrap().category_inserts
    }

    pub fn broker_inserts(&self) -> usize {
        self.state.lock().unwrap().broker_inserts
    }

    pub fn broker_updates(&self) -> usize {
        self.state.lock().unwrap().broker_updates
    }

    pub fn link_inserts(&self) -> usize {
        self.state.lock().unwrap().link_inserts
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.state.lock().unwrap().categories.clone())
    }

    async fn insert_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_category.as_deref() == Some(name) {
            return Err(api_error(500, None, "category insert failed"));
        }
        state.category_inserts += 1;
        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn find_broker_id(&self, name: &str) -> Result<Option<RecordId>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_lookups.contains(name) {
            return Err(api_error(500, None, "broker lookup failed"));
        }
        Ok(state
            .brokers
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.id.clone()))
    }

    async fn update_broker(&self, id: &RecordId, fields: &BrokerFields) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.broker_updates += 1;
        let fail_updates = state.fail_updates.clone();
        let Some(broker) = state.brokers.iter_mut().find(|b| b.id == *id) else {
            return Err(api_error(404, None, "no such broker"));
        };
        if fail_updates.contains(&broker.name) {
            return Err(api_error(500, None, "broker update failed"));
        }
        broker.fields = fields.clone();
        Ok(())
    }

    async fn insert_broker(&self, name: &str, fields: &BrokerFields) -> Result<RecordId, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_inserts.contains(name) {
            return Err(api_error(500, None, "broker insert failed"));
        }
        if state.brokers.iter().any(|b| b.name == name) {
            return Err(api_error(409, Some(UNIQUE_VIOLATION), "duplicate broker name"));
        }
        state.broker_inserts += 1;
        let id = state.next_id();
        state.brokers.push(StoredBroker {
            id: id.clone(),
            name: name.to_string(),
            fields: fields.clone(),
        });
        Ok(id)
    }

    async fn linked_category_ids(&self, broker_id: &RecordId) -> Result<Vec<RecordId>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_link_lookup {
            return Err(api_error(503, None, "link lookup unavailable"));
        }
        Ok(state
            .links
            .iter()
            .filter(|(b, _)| b == broker_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn insert_link(&self, broker_id: &RecordId, category_id: &RecordId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_links {
            return Err(api_error(500, None, "link insert failed"));
        }
        let row = (broker_id.clone(), category_id.clone());
        if state.links.contains(&row) {
            return Err(api_error(409, Some(UNIQUE_VIOLATION), "duplicate link"));
        }
        state.link_inserts += 1;
        state.links.push(row);
        if state.duplicate_on_link {
            return Err(api_error(409, Some(UNIQUE_VIOLATION), "duplicate link"));
        }
        Ok(())
    }
}
