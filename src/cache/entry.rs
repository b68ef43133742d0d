use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched
    Idle,
    /// No remote connection yet; render a placeholder, not an error
    NotReady,
    Loading,
    Success,
    Error,
}

/// What a view sees for one key.
///
/// A stale or failed entry still carries the last successful value.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: Option<T>,
    pub error: Option<AppError>,
    pub status: QueryStatus,
    pub stale: bool,
}

impl<T> CacheEntry<T> {
    pub fn idle() -> Self {
        Self {
            value: None,
            error: None,
            status: QueryStatus::Idle,
            stale: false,
        }
    }

    pub fn not_ready(value: Option<T>) -> Self {
        Self {
            value,
            error: None,
            status: QueryStatus::NotReady,
            stale: true,
        }
    }

    /// Entry for a settled fetch that could not be stored
    pub fn from_outcome(outcome: AppResult<T>) -> Self {
        match outcome {
            Ok(value) => Self {
                value: Some(value),
                error: None,
                status: QueryStatus::Success,
                stale: false,
            },
            Err(AppError::NotReady) => Self::not_ready(None),
            Err(error) => Self {
                value: None,
                error: Some(error),
                status: QueryStatus::Error,
                stale: false,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn is_not_ready(&self) -> bool {
        self.status == QueryStatus::NotReady
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Loading | QueryStatus::NotReady)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Collapse into a plain result: the error if the last attempt failed,
    /// otherwise the value, otherwise NotReady.
    pub fn into_result(self) -> AppResult<T> {
        match (self.status, self.error, self.value) {
            (QueryStatus::Error, Some(error), _) => Err(error),
            (_, _, Some(value)) => Ok(value),
            (_, Some(error), None) => Err(error),
            (_, None, None) => Err(AppError::NotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_outcome() {
        let entry = CacheEntry::from_outcome(Ok(3));
        assert!(entry.is_success());
        assert_eq!(entry.into_result().unwrap(), 3);
    }

    #[test]
    fn test_not_ready_outcome_is_not_an_error() {
        let entry: CacheEntry<u8> = CacheEntry::from_outcome(Err(AppError::NotReady));
        assert!(entry.is_not_ready());
        assert!(entry.error.is_none());
        assert!(entry.is_loading());
    }

    #[test]
    fn test_error_wins_over_stale_value() {
        let entry = CacheEntry {
            value: Some(1),
            error: Some(AppError::Remote("boom".to_string())),
            status: QueryStatus::Error,
            stale: true,
        };
        assert_eq!(entry.into_result().unwrap_err().to_string(), "boom");
    }
}
