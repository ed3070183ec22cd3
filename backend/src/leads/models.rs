use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamps;
use crate::validation::{self, FieldError, Validate};

/// Status every lead starts with.
pub const STATUS_NEW: &str = "new";
pub const STATUS_CONTACTED: &str = "contacted";
pub const STATUS_CONVERTED: &str = "converted";

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;

fn default_status() -> String {
    STATUS_NEW.to_string()
}

/// Sales inquiry record, in its stored shape.
///
/// `status` is a free-form label. The three constants above are the buckets
/// the stats endpoint reports; any other value is accepted and stored as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub trade: String,
    pub areas: String,
    pub message: String,
    /// ISO-8601 text, see `timestamps::to_stored_text`.
    pub created_at: String,
    #[serde(default = "default_status")]
    pub status: String,
}

impl ContactLead {
    pub fn new(input: ContactLeadCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            trade: input.trade,
            areas: input.areas,
            message: input.message,
            created_at: timestamps::to_stored_text(&now),
            status: default_status(),
        }
    }
}

/// Contact-form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactLeadCreate {
    pub name: String,
    pub email: String,
    pub trade: String,
    pub areas: String,
    pub message: String,
}

impl Validate for ContactLeadCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::collect([validation::email(&["body", "email"], &self.email)])
    }
}

/// What the API returns for a lead. `created_at` stays text, unlike `StatusCheck`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLeadResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub trade: String,
    pub areas: String,
    pub message: String,
    pub created_at: String,
    pub status: String,
}

impl From<ContactLead> for ContactLeadResponse {
    fn from(lead: ContactLead) -> Self {
        Self {
            id: lead.id,
            name: lead.name,
            email: lead.email,
            trade: lead.trade,
            areas: lead.areas,
            message: lead.message,
            created_at: lead.created_at,
            status: lead.status,
        }
    }
}

/// Query string of `GET /leads`.
///
/// `limit` is kept as text so a non-integer value is reported as a field
/// error on `limit` instead of a generic query-string failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
}

impl LeadListQuery {
    /// Status filter; an empty value means no filter.
    pub fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Call after `validate`, so the value is already a number within range.
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT) as usize
    }
}

impl Validate for LeadListQuery {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let loc = ["query", "limit"];
        let check = match self.limit.as_deref() {
            None => None,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(limit) => validation::in_range(&loc, limit, 1, MAX_LIST_LIMIT),
                Err(_) => Some(FieldError::new(
                    &loc,
                    "Input should be a valid integer, unable to parse string as an integer",
                    "int_parsing",
                )),
            },
        };
        validation::collect([check])
    }
}

/// Query string of `PATCH /leads/{id}/status`. Any value is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateQuery {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub message: String,
    pub lead_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadDeleted {
    pub message: String,
    pub lead_id: String,
}

/// Independent counts; leads with other status values only count toward `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub converted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(email: &str) -> ContactLeadCreate {
        ContactLeadCreate {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            trade: "Plumber".to_string(),
            areas: "London, Surrey".to_string(),
            message: "Need a website".to_string(),
        }
    }

    #[test]
    fn test_new_lead_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let lead = ContactLead::new(submission("jane@example.com"), now);

        assert_eq!(lead.status, STATUS_NEW);
        assert_eq!(lead.created_at, "2025-02-03T04:05:06.000000+00:00");
        assert!(Uuid::parse_str(&lead.id).is_ok());
    }

    #[test]
    fn test_email_validation() {
        assert!(submission("jane@example.com").validate().is_ok());

        let errors = submission("not-an-email").validate().unwrap_err();
        assert_eq!(errors[0].loc, vec!["body", "email"]);
    }

    #[test]
    fn test_stored_lead_without_status_reads_as_new() {
        let lead: ContactLead = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "n",
            "email": "e@example.com",
            "trade": "t",
            "areas": "a",
            "message": "m",
            "created_at": "2025-01-01T00:00:00+00:00",
            "_legacy": true
        }))
        .unwrap();
        assert_eq!(lead.status, STATUS_NEW);
    }

    #[test]
    fn test_list_query_limits() {
        let default = LeadListQuery::default();
        assert!(default.validate().is_ok());
        assert_eq!(default.limit(), 100);

        for ok in [1, 5, 500] {
            let q = LeadListQuery {
                status: None,
                limit: Some(ok.to_string()),
            };
            assert!(q.validate().is_ok());
            assert_eq!(q.limit(), ok as usize);
        }

        for bad in ["0", "-3", "501", "abc", ""] {
            let q = LeadListQuery {
                status: None,
                limit: Some(bad.to_string()),
            };
            assert!(q.validate().is_err(), "limit {} should be rejected", bad);
        }
    }

    #[test]
    fn test_empty_status_means_no_filter() {
        let q = LeadListQuery {
            status: Some(String::new()),
            limit: None,
        };
        assert_eq!(q.status_filter(), None);

        let q = LeadListQuery {
            status: Some("contacted".to_string()),
            limit: None,
        };
        assert_eq!(q.status_filter(), Some("contacted"));
    }

    #[test]
    fn test_stats_serialize_keys() {
        let stats = LeadStats {
            total: 4,
            new: 2,
            contacted: 1,
            converted: 0,
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            serde_json::json!({ "total": 4, "new": 2, "contacted": 1, "converted": 0 })
        );
    }
}
