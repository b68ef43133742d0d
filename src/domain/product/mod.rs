pub mod draft;
pub mod entity;
pub mod invariants;

pub use draft::{ProductDraft, ProductSubmission};
pub use entity::{PaginatedProducts, Product, ProductId, WoodType};
pub use invariants::validate_product;
