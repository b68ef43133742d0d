// src/services/query_keys.rs
//
// Cache key names shared by every service, so a mutation in one service can
// invalidate reads owned by another.

use crate::cache::{KeyPattern, QueryKey};

pub const LIST_PRODUCTS_PAGE: &str = "listProductsPage";
pub const FEATURED_PRODUCTS: &str = "featuredProducts";
pub const PRODUCTS: &str = "products";
pub const PRODUCT: &str = "product";
pub const PRODUCTS_BY_CATEGORY: &str = "productsGroupedByCategory";
pub const ANALYTICS_SUMMARY: &str = "analyticsSummary";
pub const CONTACT_SUBMISSIONS: &str = "contactFormSubmissions";
pub const CUSTOMIZATION_REQUESTS: &str = "customizationRequests";
pub const CURRENT_USER_PROFILE: &str = "currentUserProfile";
pub const USER_PROFILE: &str = "userProfile";
pub const CALLER_USER_ROLE: &str = "callerUserRole";
pub const IS_CALLER_ADMIN: &str = "isCallerAdmin";

pub fn products_page(page: u64) -> QueryKey {
    QueryKey::new(LIST_PRODUCTS_PAGE).param(page)
}

pub fn products(category: Option<&str>) -> QueryKey {
    QueryKey::new(PRODUCTS).optional_param(category)
}

pub fn product(id: &str) -> QueryKey {
    QueryKey::new(PRODUCT).param(id)
}

/// Everything a catalog mutation can change
pub fn catalog_reads() -> Vec<KeyPattern> {
    [
        LIST_PRODUCTS_PAGE,
        FEATURED_PRODUCTS,
        PRODUCTS,
        PRODUCTS_BY_CATEGORY,
        ANALYTICS_SUMMARY,
    ]
    .into_iter()
    .map(KeyPattern::operation)
    .collect()
}

/// Catalog reads plus the single-product entry for `id`
pub fn catalog_reads_for(id: &str) -> Vec<KeyPattern> {
    let mut patterns = catalog_reads();
    patterns.push(KeyPattern::Exact(product(id)));
    patterns
}
