use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamps;
use crate::validation::{self, FieldError, Validate};

/// Max records returned by the status-check listing.
pub const LIST_LIMIT: usize = 1000;

/// Diagnostic ping record, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusCheck {
    /// `now` is cut to microseconds, the precision the stored text keeps, so
    /// the record returned on create equals the one listed later.
    pub fn new(client_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name,
            timestamp: now.trunc_subsecs(6),
        }
    }
}

/// Stored shape of a `StatusCheck`: the timestamp is kept as ISO-8601 text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckDocument {
    pub id: String,
    pub client_name: String,
    pub timestamp: String,
}

impl From<&StatusCheck> for StatusCheckDocument {
    fn from(check: &StatusCheck) -> Self {
        Self {
            id: check.id.clone(),
            client_name: check.client_name.clone(),
            timestamp: timestamps::to_stored_text(&check.timestamp),
        }
    }
}

impl StatusCheckDocument {
    /// `None` when the stored timestamp text cannot be parsed.
    pub fn into_status_check(self) -> Option<StatusCheck> {
        let timestamp = timestamps::parse_flexible(&self.timestamp)?;
        Some(StatusCheck {
            id: self.id,
            client_name: self.client_name,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl Validate for StatusCheckCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::collect([validation::non_empty(
            &["body", "client_name"],
            &self.client_name,
        )])
    }
}
