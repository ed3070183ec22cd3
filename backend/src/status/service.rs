use chrono::Utc;
use tracing::warn;

use crate::status::models::{StatusCheck, StatusCheckCreate, StatusCheckDocument, LIST_LIMIT};
use crate::store::{Collection, DynDocumentStore, Filter, Sort, StoreResult};

/// Status-check collection access.
#[derive(Clone)]
pub struct StatusCheckRepository {
    store: DynDocumentStore,
}

impl StatusCheckRepository {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store }
    }

    /// Stamp a new check with a fresh id and the current time, then insert it.
    pub async fn create(&self, input: StatusCheckCreate) -> StoreResult<StatusCheck> {
        let check = StatusCheck::new(input.client_name, Utc::now());
        let doc = serde_json::to_value(StatusCheckDocument::from(&check))?;

        self.store.insert_one(Collection::StatusChecks, doc).await?;

        Ok(check)
    }

    /// Up to `LIST_LIMIT` checks in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<StatusCheck>> {
        let docs = self
            .store
            .find(Collection::StatusChecks, &Filter::new(), &Sort::Natural, LIST_LIMIT)
            .await?;

        let mut checks = Vec::with_capacity(docs.len());
        for doc in docs {
            match serde_json::from_value::<StatusCheckDocument>(doc) {
                Ok(stored) => {
                    let id = stored.id.clone();
                    match stored.into_status_check() {
                        Some(check) => checks.push(check),
                        None => warn!("Skipping status check {} with unparseable timestamp", id),
                    }
                }
                Err(e) => warn!("Skipping malformed status check document: {:?}", e),
            }
        }

        Ok(checks)
    }
}
