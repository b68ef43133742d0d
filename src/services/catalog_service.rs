// src/services/catalog_service.rs
//
// Catalog Service - product reads and admin mutations
//
// CRITICAL RULES:
// - Reads go through the query cache, never straight to the backend
// - Every mutation checks isCallerAdmin inside the write, so a refused
//   caller invalidates nothing
// - Product ids never change on update

use std::sync::Arc;

use crate::cache::{CacheEntry, QueryCache, QueryKey};
use crate::config::{ImageLimits, StorefrontConfig, DEFAULT_PAGE_SIZE};
use crate::domain::{
    validate_product, AnalyticsSummary, CategoryGroup, DomainError, PaginatedProducts, Product,
    ProductDraft, ProductId, ProductSubmission,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{compress_all, ImageRejection};
use crate::integrations::CatalogBackend;
use crate::services::query_keys as keys;

/// Result of saving a product form
#[derive(Debug, Clone)]
pub struct SavedDraft {
    pub product_id: ProductId,
    pub created: bool,
    /// Uploads left out because they could not be decoded
    pub rejected_images: Vec<ImageRejection>,
}

pub struct CatalogService {
    cache: Arc<QueryCache>,
    page_size: u64,
    image_limits: ImageLimits,
}

impl CatalogService {
    pub fn new(cache: Arc<QueryCache>, page_size: u64, image_limits: ImageLimits) -> Self {
        Self {
            cache,
            page_size: page_size.max(1),
            image_limits,
        }
    }

    pub fn from_config(cache: Arc<QueryCache>, config: &StorefrontConfig) -> Self {
        Self::new(cache, config.page_size, config.image_limits)
    }

    pub fn with_defaults(cache: Arc<QueryCache>) -> Self {
        Self::new(cache, DEFAULT_PAGE_SIZE, ImageLimits::default())
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Zero-based page of the whole catalog
    pub async fn products_page(&self, page: u64) -> CacheEntry<PaginatedProducts> {
        let limit = self.page_size;
        let offset = page.saturating_mul(limit);
        self.cache
            .read_remote(keys::products_page(page), move |backend| async move {
                backend.list_products(offset, limit).await
            })
            .await
    }

    pub async fn products(&self, category: Option<&str>) -> CacheEntry<Vec<Product>> {
        let filter = category.map(str::to_string);
        self.cache
            .read_remote(keys::products(category), move |backend| {
                let filter = filter.clone();
                async move { backend.get_products(filter).await }
            })
            .await
    }

    pub async fn product_by_id(&self, id: &str) -> CacheEntry<Product> {
        let id = id.to_string();
        self.cache
            .read_remote(keys::product(&id), move |backend| {
                let id = id.clone();
                async move { backend.get_product_by_id(&id).await }
            })
            .await
    }

    pub async fn featured_products(&self) -> CacheEntry<Vec<Product>> {
        self.cache
            .read_remote(QueryKey::new(keys::FEATURED_PRODUCTS), |backend| async move {
                backend.get_featured_products().await
            })
            .await
    }

    pub async fn products_grouped_by_category(&self) -> CacheEntry<Vec<CategoryGroup>> {
        self.cache
            .read_remote(QueryKey::new(keys::PRODUCTS_BY_CATEGORY), |backend| async move {
                backend.get_products_grouped_by_category().await
            })
            .await
    }

    /// Admin dashboard counters; Unauthorized for non-admin callers
    pub async fn analytics_summary(&self) -> CacheEntry<AnalyticsSummary> {
        self.cache
            .read_remote(QueryKey::new(keys::ANALYTICS_SUMMARY), |backend| async move {
                backend.get_analytics_summary().await
            })
            .await
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    pub async fn add_product(&self, product: Product) -> AppResult<()> {
        validate_product(&product)?;
        self.cache
            .write_remote("addProduct", &keys::catalog_reads(), |backend| async move {
                require_admin(backend.as_ref(), "add products").await?;
                backend.add_product(product).await
            })
            .await
    }

    pub async fn update_product(&self, id: &str, product: Product) -> AppResult<()> {
        if product.id != id {
            return Err(DomainError::InvariantViolation(format!(
                "product id cannot change from {} to {}",
                id, product.id
            ))
            .into());
        }
        validate_product(&product)?;
        self.cache
            .write_remote("updateProduct", &keys::catalog_reads_for(id), |backend| async move {
                require_admin(backend.as_ref(), "update products").await?;
                backend.update_product(id, product).await
            })
            .await
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<()> {
        self.cache
            .write_remote("deleteProduct", &keys::catalog_reads_for(id), |backend| async move {
                require_admin(backend.as_ref(), "delete products").await?;
                backend.delete_product(id).await
            })
            .await
    }

    /// Compress `uploads`, append them to the draft and create or update the
    /// product. Undecodable uploads are reported, not fatal.
    pub async fn save_draft(
        &self,
        mut draft: ProductDraft,
        uploads: Vec<(String, Vec<u8>)>,
    ) -> AppResult<SavedDraft> {
        let batch = compress_all(uploads, self.image_limits).await;
        draft.new_images.extend(batch.images);

        let submission = draft.submit()?;
        let product_id = submission.id().to_string();
        let created = match submission {
            ProductSubmission::Create(product) => {
                self.add_product(product).await?;
                true
            }
            ProductSubmission::Update { id, product } => {
                self.update_product(&id, product).await?;
                false
            }
        };

        log::info!(
            "saved product {} ({} images rejected)",
            product_id,
            batch.rejected.len()
        );
        Ok(SavedDraft {
            product_id,
            created,
            rejected_images: batch.rejected,
        })
    }
}

async fn require_admin(backend: &dyn CatalogBackend, action: &str) -> AppResult<()> {
    if backend.is_caller_admin().await? {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!(
            "Unauthorized: Only admins can {}",
            action
        )))
    }
}
