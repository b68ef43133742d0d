// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Owns the client session and the state bundle handed to views
// - Translates AppError into view-facing responses
// - Holds no business rules of its own

pub mod error_handling;
pub mod session;
pub mod state;

pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use session::Session;
pub use state::AppState;
