// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services own no state of their own; they route reads through the query
// cache and mutations through cache writes.

pub mod bulk_import_service;
pub mod catalog_service;
pub mod lead_service;
pub mod listing_controller;
pub mod profile_service;
pub mod query_keys;


// Re-export all services and their types
pub use bulk_import_service::{
    BulkImportService,
    ImportFailure,
    ImportProgress,
    ImportReport,
    ImportSpec,
};

pub use catalog_service::{
    CatalogService,
    SavedDraft,
};

pub use lead_service::LeadService;

pub use listing_controller::{
    ListingController,
    ListingFilter,
    ListingPhase,
    ListingSnapshot,
};

pub use profile_service::ProfileService;
