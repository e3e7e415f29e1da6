//! In-memory document store
//!
//! Backs the integration tests and credential-less local runs. Documents
//! live in a `BTreeMap` per collection so iteration order matches the
//! remote store's natural document-id order, which keeps cursor pagination
//! behavior identical across implementations.

use super::{field_at, DocumentStore};
use anyhow::Result;
use async_trait::async_trait;
use gym_manager_shared::Document;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection (test inspection).
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, doc: Document) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<()> {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| anyhow::anyhow!("no document {collection}/{id} to update"))?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
        limit: usize,
        start_after: Option<&str>,
    ) -> Result<Vec<(String, Document)>> {
        let collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let lower = match start_after {
            Some(id) => Bound::Excluded(id.to_string()),
            None => Bound::Unbounded,
        };
        let matches = docs
            .range((lower, Bound::Unbounded))
            .filter(|(_, doc)| field_at(doc, field_path) == Some(value))
            .take(limit)
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        Ok(matches)
    }
}
