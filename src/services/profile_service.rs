// src/services/profile_service.rs
//
// Profile Service - caller identity, profile and role

use std::sync::Arc;

use crate::cache::{CacheEntry, KeyPattern, QueryCache, QueryKey};
use crate::domain::{DomainError, UserProfile, UserRole};
use crate::error::AppResult;
use crate::services::query_keys as keys;

pub struct ProfileService {
    cache: Arc<QueryCache>,
}

impl ProfileService {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    /// `None` until the caller saves a profile
    pub async fn caller_profile(&self) -> CacheEntry<Option<UserProfile>> {
        self.cache
            .read_remote(QueryKey::new(keys::CURRENT_USER_PROFILE), |backend| async move {
                backend.get_caller_user_profile().await
            })
            .await
    }

    pub async fn save_caller_profile(&self, profile: UserProfile) -> AppResult<()> {
        let profile = UserProfile {
            name: profile.name.trim().to_string(),
        };
        if profile.name.is_empty() {
            return Err(DomainError::InvariantViolation("profile name cannot be empty".into()).into());
        }

        let invalidates = [
            KeyPattern::operation(keys::CURRENT_USER_PROFILE),
            KeyPattern::operation(keys::USER_PROFILE),
        ];
        self.cache
            .write_remote("saveCallerUserProfile", &invalidates, |backend| async move {
                backend.save_caller_user_profile(profile).await
            })
            .await
    }

    pub async fn user_profile(&self, principal: &str) -> CacheEntry<Option<UserProfile>> {
        let principal = principal.to_string();
        self.cache
            .read_remote(QueryKey::new(keys::USER_PROFILE).param(&principal), move |backend| {
                let principal = principal.clone();
                async move { backend.get_user_profile(&principal).await }
            })
            .await
    }

    pub async fn caller_role(&self) -> CacheEntry<UserRole> {
        self.cache
            .read_remote(QueryKey::new(keys::CALLER_USER_ROLE), |backend| async move {
                backend.get_caller_user_role().await
            })
            .await
    }

    pub async fn is_caller_admin(&self) -> CacheEntry<bool> {
        self.cache
            .read_remote(QueryKey::new(keys::IS_CALLER_ADMIN), |backend| async move {
                backend.is_caller_admin().await
            })
            .await
    }

    pub async fn assign_role(&self, principal: &str, role: UserRole) -> AppResult<()> {
        let invalidates = [
            KeyPattern::operation(keys::CALLER_USER_ROLE),
            KeyPattern::operation(keys::IS_CALLER_ADMIN),
        ];
        self.cache
            .write_remote("assignCallerUserRole", &invalidates, |backend| async move {
                backend.assign_caller_user_role(principal, role).await
            })
            .await
    }
}
