// src/error/types.rs
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Every failure the storefront core can surface.
///
/// Values are `Clone` so a single in-flight fetch can hand the same
/// outcome to every caller that attached to it.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// No remote connection has been established for this session yet.
    #[error("Remote connection is not ready")]
    NotReady,

    /// Remote message, displayed verbatim.
    #[error("{0}")]
    Remote(String),

    /// The caller lacks the admin capability for the operation.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Other error: {0}")]
    Other(String),
}

fn authorization_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)unauthori[sz]ed|only admins?|permission denied|not an admin|admin (role|capability) required")
            .expect("authorization pattern is a valid regex")
    })
}

fn not_found_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)not found|does not exist|no such product")
            .expect("not-found pattern is a valid regex")
    })
}

impl AppError {
    /// Classify a message reported by the remote service.
    pub fn remote(message: impl Into<String>) -> Self {
        let message = message.into();
        if authorization_pattern().is_match(&message) {
            AppError::Unauthorized(message)
        } else if not_found_pattern().is_match(&message) {
            AppError::NotFound(message)
        } else {
            AppError::Remote(message)
        }
    }

    /// Whether a read may be attempted again automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Remote(_) | AppError::Timeout(_) | AppError::Io(_)
        )
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, AppError::NotReady)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Remote(format!("Catalog request timed out: {}", err));
        }
        AppError::Remote(format!("Catalog request failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Other(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
