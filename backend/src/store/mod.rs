//! Document-store gateway
//!
//! The persistence layer is a remote document database consumed through the
//! [`DocumentStore`] trait: collection-scoped create-with-generated-id,
//! get-by-id, full set, merge-update of named fields, and equality queries
//! with a limit and an id cursor. Query results come back in the store's
//! natural (document-id) order; `start_after` continues strictly after the
//! given id, which is what the listing endpoints build their cursor
//! pagination on.

use anyhow::Result;
use async_trait::async_trait;
use gym_manager_shared::Document;
use serde_json::Value;

mod firestore;
mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Remote document collection operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, letting the store generate its id.
    async fn add(&self, collection: &str, doc: Document) -> Result<String>;

    /// Fetch a document by id. Absent documents are `None`, not an error.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Write a document at a caller-chosen id, replacing any existing one.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<()>;

    /// Merge-set the named top-level fields of an existing document,
    /// leaving other fields untouched.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Equality query on a (possibly dotted) field path, in natural id
    /// order, returning at most `limit` documents. With `start_after`, the
    /// page begins strictly after that document id.
    async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
        limit: usize,
        start_after: Option<&str>,
    ) -> Result<Vec<(String, Document)>>;
}

/// Resolve a dotted field path (`active_gym.gym_name`) inside a document.
pub fn field_at<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
