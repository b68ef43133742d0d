pub mod entity;
pub use entity::{UserProfile, UserRole};
