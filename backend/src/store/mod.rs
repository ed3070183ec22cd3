// src/store/mod.rs
//
// Document store abstraction.
//
// Every collection holds schemaless JSON documents keyed by their string `id`
// field. Repositories (status checks, leads) talk to the store only through
// the `DocumentStore` trait so they can run against Postgres in production and
// against the in-memory store in tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgDocumentStore;

#[cfg(test)]
pub use memory::MemoryDocumentStore;

/// Named collections the service persists into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    StatusChecks,
    ContactLeads,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::StatusChecks => "status_checks",
            Collection::ContactLeads => "contact_leads",
        }
    }

    pub fn all() -> [Collection; 2] {
        [Collection::StatusChecks, Collection::ContactLeads]
    }
}

/// Conjunction of exact string matches on top-level document fields.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    /// Whether `doc` satisfies every condition. Non-string fields never match.
    pub fn matches(&self, doc: &JsonValue) -> bool {
        self.conditions.iter().all(|(field, value)| {
            doc.get(field).and_then(JsonValue::as_str) == Some(value.as_str())
        })
    }
}

/// Result ordering for `find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
    /// Insertion order.
    Natural,
    /// Descending by the text value of a field.
    Descending(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("malformed document: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. The document must carry a string `id` field.
    async fn insert_one(&self, collection: Collection, doc: JsonValue) -> StoreResult<()>;

    /// Documents matching `filter`, ordered by `sort`, at most `limit` of them.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: &Sort,
        limit: usize,
    ) -> StoreResult<Vec<JsonValue>>;

    /// Set one top-level field on the document with the given id.
    ///
    /// Returns `false` when no document matched. Setting a field to its
    /// current value still counts as a match.
    async fn set_field_by_id(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> StoreResult<bool>;

    /// Remove the document with the given id. Returns `false` when none existed.
    async fn delete_by_id(&self, collection: Collection, id: &str) -> StoreResult<bool>;

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Cheap reachability check.
    async fn ping(&self) -> StoreResult<()>;
}

/// Convenient type alias for dyn store.
pub type DynDocumentStore = Arc<dyn DocumentStore>;

/// Extract the string `id` a document is keyed by.
pub(crate) fn document_id(doc: &JsonValue) -> StoreResult<&str> {
    doc.get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| StoreError::Malformed("document has no string `id` field".to_string()))
}
