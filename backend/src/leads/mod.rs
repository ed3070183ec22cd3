// src/leads/mod.rs
//
// Contact-form leads: submission, listing, status changes, deletion, stats.

pub mod models;
pub mod service;

// Re-export commonly used items for convenience
pub use models::{
    ContactLeadCreate, ContactLeadResponse, LeadDeleted, LeadListQuery, LeadStats,
    StatusUpdateQuery, StatusUpdated,
};
pub use service::LeadRepository;
