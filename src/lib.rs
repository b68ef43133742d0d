// src/lib.rs
// Woodworks - storefront data-access core for a handcrafted furniture catalog
//
// Architecture:
// - Remote-first: the catalog service owns all persistent data
// - Explicit session: the connection is threaded into cache and listings,
//   never held in a global
// - Query cache: deduplicated, invalidatable reads; mutations invalidate
//   only after success
// - Listings: per-view paginated accumulation with liveness tracking

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod integrations;

// ============================================================================
// CLIENT CORE
// ============================================================================

pub mod application;
pub mod cache;
pub mod services;

#[cfg(test)]
mod test_support;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_product,
    AnalyticsSummary,
    CategoryGroup,
    ContactForm,
    ContactFormSubmission,
    CustomizationRequest,
    DomainError,
    LeadReceipt,
    PaginatedProducts,
    Product,
    ProductDraft,
    ProductId,
    ProductSubmission,
    UserProfile,
    UserRole,
    WhatsAppLink,
    WoodType,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{ImageLimits, StorefrontConfig};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Cache
// ============================================================================

pub use cache::{CacheEntry, KeyPattern, QueryCache, QueryKey, QueryPolicy, QueryStatus};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    BulkImportService,
    CatalogService,
    ImportReport,
    ImportSpec,
    LeadService,
    ListingController,
    ListingFilter,
    ListingPhase,
    ListingSnapshot,
    ProfileService,
};

// ============================================================================
// PUBLIC API - Application & Integrations
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType, Session};
pub use infrastructure::{compress, compress_async, CompressedImage};
pub use integrations::{CatalogBackend, HttpCatalogClient};
