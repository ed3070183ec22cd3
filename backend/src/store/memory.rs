// src/store/memory.rs
//
// In-memory document store with the same semantics as `PgDocumentStore`.
// Used by repository and route tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::store::{
    document_id, Collection, DocumentStore, Filter, Sort, StoreError, StoreResult,
};

#[derive(Default)]
pub struct MemoryDocumentStore {
    // Vec keeps insertion order.
    collections: RwLock<HashMap<Collection, Vec<JsonValue>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Descending text order; documents without the field sort last.
fn compare_desc(a: &JsonValue, b: &JsonValue, field: &str) -> Ordering {
    let a = a.get(field).and_then(JsonValue::as_str);
    let b = b.get(field).and_then(JsonValue::as_str);
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: Collection, doc: JsonValue) -> StoreResult<()> {
        let id = document_id(&doc)?.to_string();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if docs.iter().any(|d| d.get("id").and_then(JsonValue::as_str) == Some(id.as_str())) {
            return Err(StoreError::Malformed(format!("duplicate id {}", id)));
        }

        docs.push(doc);
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: &Sort,
        limit: usize,
    ) -> StoreResult<Vec<JsonValue>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<JsonValue> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        if let Sort::Descending(field) = sort {
            // Reverse first so ties come out newest-inserted first, as in Postgres.
            matched.reverse();
            matched.sort_by(|a, b| compare_desc(a, b, field));
        }

        matched.truncate(limit);
        Ok(matched)
    }

    async fn set_field_by_id(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: JsonValue,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let doc = collections.get_mut(&collection).and_then(|docs| {
            docs.iter_mut()
                .find(|d| d.get("id").and_then(JsonValue::as_str) == Some(id))
        });

        match doc.and_then(JsonValue::as_object_mut) {
            Some(obj) => {
                obj.insert(field.to_string(), value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|d| d.get("id").and_then(JsonValue::as_str) != Some(id));
        Ok(docs.len() < before)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for (id, status, created_at) in [
            ("a", "new", "2025-01-01T10:00:00.000000+00:00"),
            ("b", "contacted", "2025-01-03T10:00:00.000000+00:00"),
            ("c", "new", "2025-01-02T10:00:00.000000+00:00"),
        ] {
            store
                .insert_one(
                    Collection::ContactLeads,
                    json!({ "id": id, "status": status, "created_at": created_at }),
                )
                .await
                .unwrap();
        }
        store
    }

    fn ids(docs: &[JsonValue]) -> Vec<&str> {
        docs.iter().map(|d| d["id"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_find_natural_order() {
        let store = seeded().await;
        let docs = store
            .find(Collection::ContactLeads, &Filter::new(), &Sort::Natural, 10)
            .await
            .unwrap();
        assert_eq!(ids(&docs), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_find_filtered_sorted_limited() {
        let store = seeded().await;
        let sort = Sort::Descending("created_at".to_string());

        let docs = store
            .find(Collection::ContactLeads, &Filter::new().eq("status", "new"), &sort, 10)
            .await
            .unwrap();
        assert_eq!(ids(&docs), vec!["c", "a"]);

        let docs = store
            .find(Collection::ContactLeads, &Filter::new(), &sort, 2)
            .await
            .unwrap();
        assert_eq!(ids(&docs), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = seeded().await;
        let count = store
            .count(Collection::StatusChecks, &Filter::new())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_set_field_and_delete() {
        let store = seeded().await;

        assert!(store
            .set_field_by_id(Collection::ContactLeads, "a", "status", json!("converted"))
            .await
            .unwrap());
        // same value again still matches
        assert!(store
            .set_field_by_id(Collection::ContactLeads, "a", "status", json!("converted"))
            .await
            .unwrap());
        assert!(!store
            .set_field_by_id(Collection::ContactLeads, "zzz", "status", json!("x"))
            .await
            .unwrap());

        let converted = store
            .count(Collection::ContactLeads, &Filter::new().eq("status", "converted"))
            .await
            .unwrap();
        assert_eq!(converted, 1);

        assert!(store.delete_by_id(Collection::ContactLeads, "a").await.unwrap());
        assert!(!store.delete_by_id(Collection::ContactLeads, "a").await.unwrap());
        assert_eq!(
            store.count(Collection::ContactLeads, &Filter::new()).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_insert_requires_id() {
        let store = MemoryDocumentStore::new();
        let result = store
            .insert_one(Collection::StatusChecks, json!({ "client_name": "x" }))
            .await;
        assert!(result.is_err());
    }
}
