//! Leads: contact-form and customization submissions followed up on WhatsApp.

pub mod entity;
pub mod invariants;
pub mod whatsapp;

pub use entity::{ContactForm, ContactFormSubmission, CustomizationRequest, LeadReceipt};
pub use invariants::{validate_contact_submission, validate_customization_request};
pub use whatsapp::WhatsAppLink;
