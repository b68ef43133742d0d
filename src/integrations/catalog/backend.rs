// src/integrations/catalog/backend.rs
//
// Remote Catalog Seam
//
// RULES:
// - One method per remote operation, nothing more
// - Caller identity is ambient to the connection, never passed in
// - Remote failures come back as `AppError::remote(message)` so
//   authorization and not-found messages are classified uniformly

use async_trait::async_trait;

use crate::domain::{
    AnalyticsSummary, CategoryGroup, ContactFormSubmission, CustomizationRequest,
    PaginatedProducts, Product, UserProfile, UserRole,
};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    // ---- catalog reads ----

    /// Paginated catalog window
    async fn list_products(&self, offset: u64, limit: u64) -> AppResult<PaginatedProducts>;

    /// Unpaginated read; `None` means no category filter
    async fn get_products(&self, category: Option<String>) -> AppResult<Vec<Product>>;

    async fn get_product_by_id(&self, id: &str) -> AppResult<Product>;

    async fn get_featured_products(&self) -> AppResult<Vec<Product>>;

    async fn get_products_grouped_by_category(&self) -> AppResult<Vec<CategoryGroup>>;

    // ---- catalog mutations (admin only) ----

    async fn add_product(&self, product: Product) -> AppResult<()>;

    async fn update_product(&self, id: &str, product: Product) -> AppResult<()>;

    async fn delete_product(&self, id: &str) -> AppResult<()>;

    // ---- analytics & leads ----

    async fn get_analytics_summary(&self) -> AppResult<AnalyticsSummary>;

    /// Returns the WhatsApp URL chosen by the remote service, if any
    async fn submit_contact_form(&self, submission: ContactFormSubmission)
        -> AppResult<Option<String>>;

    async fn submit_customization_request(&self, request: CustomizationRequest) -> AppResult<()>;

    async fn get_most_recent_contact_form_submissions(
        &self,
        limit: u64,
    ) -> AppResult<Vec<ContactFormSubmission>>;

    async fn get_most_recent_customization_requests(
        &self,
        limit: u64,
    ) -> AppResult<Vec<CustomizationRequest>>;

    // ---- identity ----

    async fn get_caller_user_profile(&self) -> AppResult<Option<UserProfile>>;

    async fn save_caller_user_profile(&self, profile: UserProfile) -> AppResult<()>;

    async fn get_user_profile(&self, principal: &str) -> AppResult<Option<UserProfile>>;

    async fn get_caller_user_role(&self) -> AppResult<UserRole>;

    async fn is_caller_admin(&self) -> AppResult<bool>;

    async fn assign_caller_user_role(&self, principal: &str, role: UserRole) -> AppResult<()>;
}
