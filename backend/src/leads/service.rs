use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::leads::models::{
    ContactLead, ContactLeadCreate, LeadStats, STATUS_CONTACTED, STATUS_CONVERTED, STATUS_NEW,
};
use crate::store::{Collection, DynDocumentStore, Filter, Sort, StoreResult};

/// Contact-lead collection access.
///
/// Each method maps onto one store call (`stats` onto four independent counts),
/// so there is no read-modify-write window in the service.
#[derive(Clone)]
pub struct LeadRepository {
    store: DynDocumentStore,
}

impl LeadRepository {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: ContactLeadCreate) -> StoreResult<ContactLead> {
        let lead = ContactLead::new(input, Utc::now());
        let doc = serde_json::to_value(&lead)?;

        self.store.insert_one(Collection::ContactLeads, doc).await?;

        Ok(lead)
    }

    /// Newest first, optionally only leads with exactly `status`.
    pub async fn list(&self, status: Option<&str>, limit: usize) -> StoreResult<Vec<ContactLead>> {
        let filter = match status {
            Some(status) => Filter::new().eq("status", status),
            None => Filter::new(),
        };

        let docs = self
            .store
            .find(
                Collection::ContactLeads,
                &filter,
                &Sort::Descending("created_at".to_string()),
                limit,
            )
            .await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<ContactLead>(doc) {
                Ok(lead) => Some(lead),
                Err(e) => {
                    warn!("Skipping malformed lead document: {:?}", e);
                    None
                }
            })
            .collect())
    }

    /// Returns `false` when no lead has this id.
    pub async fn update_status(&self, lead_id: &str, status: &str) -> StoreResult<bool> {
        self.store
            .set_field_by_id(
                Collection::ContactLeads,
                lead_id,
                "status",
                JsonValue::String(status.to_string()),
            )
            .await
    }

    /// Returns `false` when no lead has this id.
    pub async fn delete(&self, lead_id: &str) -> StoreResult<bool> {
        self.store.delete_by_id(Collection::ContactLeads, lead_id).await
    }

    pub async fn stats(&self) -> StoreResult<LeadStats> {
        Ok(LeadStats {
            total: self.store.count(Collection::ContactLeads, &Filter::new()).await?,
            new: self.count_status(STATUS_NEW).await?,
            contacted: self.count_status(STATUS_CONTACTED).await?,
            converted: self.count_status(STATUS_CONVERTED).await?,
        })
    }

    async fn count_status(&self, status: &str) -> StoreResult<u64> {
        self.store
            .count(Collection::ContactLeads, &Filter::new().eq("status", status))
            .await
    }
}
