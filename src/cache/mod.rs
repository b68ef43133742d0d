// src/cache/mod.rs
//
// Query/Mutation Cache Layer
//
// RULES:
// - One entry per (operation, parameters) key
// - At most one in-flight fetch per key
// - Invalidation marks stale, never deletes values
// - Mutations are never retried

pub mod entry;
pub mod key;
pub mod query_cache;


pub use entry::{CacheEntry, QueryStatus};
pub use key::{KeyPattern, QueryKey};
pub use query_cache::{QueryCache, QueryPolicy};

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Bound a remote call; running out of time is a regular fetch error.
pub async fn with_deadline<T, Fut>(limit: Duration, call: Fut) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(AppError::Timeout(limit)))
}
