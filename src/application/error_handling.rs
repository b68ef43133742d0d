// src/application/error_handling.rs
//
// Error responses for the view layer
//
// ARCHITECTURE:
// - Maps AppError -> a stable, serializable response
// - Remote messages are shown verbatim
// - NotReady is a pending state, never a failure toast
// - Every failure tells the view whether to offer retry or re-authentication

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
    /// Offer a retry action
    pub retryable: bool,
    /// Send the user back through sign-in instead of retrying
    pub reauthenticate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Connection not established yet; render a placeholder
    NotReady,

    /// Caller lacks the admin capability
    Unauthorized,

    NotFound,

    /// Rejected locally before any remote call
    Validation,

    /// Remote or transport failure, including timeouts
    Remote,

    /// A selected image could not be processed
    Image,

    Internal,
}

impl ErrorResponse {
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotReady => Self::new(ErrorType::NotReady, error.to_string(), None, true, false),

            AppError::Unauthorized(message) => {
                Self::new(ErrorType::Unauthorized, message, None, false, true)
            }

            AppError::NotFound(message) => Self::new(ErrorType::NotFound, message, None, true, false),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::Validation,
                "Please check the form and try again".to_string(),
                Some(domain_error.to_string()),
                false,
                false,
            ),

            AppError::Remote(message) => Self::new(ErrorType::Remote, message, None, true, false),

            AppError::Timeout(_) => {
                Self::new(ErrorType::Remote, error.to_string(), None, true, false)
            }

            AppError::Decode(_) | AppError::Encode(_) => Self::new(
                ErrorType::Image,
                "Image could not be processed".to_string(),
                Some(error.to_string()),
                false,
                false,
            ),

            AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Other(_) => {
                log::error!("internal error: {}", error);
                Self::new(
                    ErrorType::Internal,
                    "Something went wrong".to_string(),
                    Some(error.to_string()),
                    true,
                    false,
                )
            }
        }
    }

    fn new(
        error_type: ErrorType,
        message: String,
        details: Option<String>,
        retryable: bool,
        reauthenticate: bool,
    ) -> Self {
        Self {
            error_type,
            message,
            details,
            retryable,
            reauthenticate,
        }
    }

    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None, false, false)
    }

    /// Pending states are rendered as loading, not as errors
    pub fn is_failure(&self) -> bool {
        self.error_type != ErrorType::NotReady
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

/// Convert results for transport to a UI boundary
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::time::Duration;

    #[test]
    fn test_unauthorized_asks_for_reauthentication() {
        let response = ErrorResponse::from_app_error(AppError::remote(
            "Unauthorized: Only admins can delete products",
        ));
        assert_eq!(response.error_type, ErrorType::Unauthorized);
        assert!(response.reauthenticate);
        assert!(!response.retryable);
        assert_eq!(response.message, "Unauthorized: Only admins can delete products");
    }

    #[test]
    fn test_remote_message_is_verbatim_and_retryable() {
        let response = ErrorResponse::from(AppError::Remote("Canister trapped".into()));
        assert_eq!(response.error_type, ErrorType::Remote);
        assert_eq!(response.message, "Canister trapped");
        assert!(response.retryable);
    }

    #[test]
    fn test_not_ready_is_not_a_failure() {
        let response = ErrorResponse::from_app_error(AppError::NotReady);
        assert_eq!(response.error_type, ErrorType::NotReady);
        assert!(!response.is_failure());
    }

    #[test]
    fn test_timeout_is_a_remote_failure() {
        let response = ErrorResponse::from_app_error(AppError::Timeout(Duration::from_secs(30)));
        assert_eq!(response.error_type, ErrorType::Remote);
        assert_eq!(response.message, "Request timed out after 30s");
    }

    #[test]
    fn test_domain_error_is_validation() {
        let response = ErrorResponse::from_app_error(AppError::Domain(
            DomainError::InvariantViolation("Name is required".into()),
        ));
        assert_eq!(response.error_type, ErrorType::Validation);
        assert!(response.details.unwrap().contains("Name is required"));
    }

    #[test]
    fn test_decode_error_is_image_error() {
        let response = ErrorResponse::from_app_error(AppError::Decode("bad header".into()));
        assert_eq!(response.error_type, ErrorType::Image);
        assert!(!response.retryable);
    }

    #[test]
    fn test_result_conversion() {
        let result: Result<(), AppError> = Err(AppError::NotFound("Product not found".into()));
        let response = result.to_error_response().unwrap_err();
        assert_eq!(response.error_type, ErrorType::NotFound);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"not_found\""));
    }
}
