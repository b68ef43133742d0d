// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod analytics;
pub mod lead;
pub mod product;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Product Domain
pub use product::{
    validate_product, PaginatedProducts, Product, ProductDraft, ProductId,
    ProductSubmission, WoodType,
};

// Lead Domain
pub use lead::{
    validate_contact_submission, validate_customization_request, ContactForm,
    ContactFormSubmission, CustomizationRequest, LeadReceipt, WhatsAppLink,
};

// Analytics (Derived Data)
pub use analytics::{AnalyticsSummary, CategoryGroup};

// User
pub use user::{UserProfile, UserRole};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
