// src/test_support.rs
//
// In-memory catalog backend for tests
//
// - Every call yields once (or waits on an installed gate) before answering,
//   so concurrent callers really overlap
// - Queued failures are returned by the next calls in order
// - Calls are recorded by remote method name

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{
    AnalyticsSummary, CategoryGroup, ContactFormSubmission, CustomizationRequest,
    PaginatedProducts, Product, UserProfile, UserRole, WoodType,
};
use crate::error::{AppError, AppResult};
use crate::integrations::CatalogBackend;

pub fn product(n: usize, category: &str) -> Product {
    Product {
        id: format!("product_{}", n),
        name: format!("Piece {}", n),
        description: format!("Handcrafted piece number {}", n),
        category: category.to_string(),
        wood_type: WoodType::MangoWood,
        image_urls: vec![vec![n as u8]],
        finish_info: "Natural oil finish".to_string(),
        is_active: true,
        whatsapp_message: None,
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<Vec<Product>>,
    total_override: Mutex<Option<u64>>,
    admin: AtomicBool,
    failures: Mutex<VecDeque<AppError>>,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
    list_windows: Mutex<Vec<(u64, u64)>>,
    contacts: Mutex<Vec<ContactFormSubmission>>,
    customizations: Mutex<Vec<CustomizationRequest>>,
    profile: Mutex<Option<UserProfile>>,
    contact_redirect: Mutex<Option<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` products in category "Tables"
    pub fn with_products(count: usize) -> Self {
        let fake = Self::new();
        fake.set_products((0..count).map(|n| product(n, "Tables")).collect());
        fake
    }

    pub fn admin(self) -> Self {
        self.admin.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    /// Report this total regardless of the stored products
    pub fn set_total(&self, total: u64) {
        *self.total_override.lock().unwrap() = Some(total);
    }

    pub fn set_contact_redirect(&self, url: &str) {
        *self.contact_redirect.lock().unwrap() = Some(url.to_string());
    }

    pub fn fail_next(&self, error: AppError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Hold every subsequent call until the returned gate is notified
    pub fn install_gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn remove_gate(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| *m == method).count()
    }

    pub fn list_windows(&self) -> Vec<(u64, u64)> {
        self.list_windows.lock().unwrap().clone()
    }

    pub fn contacts(&self) -> Vec<ContactFormSubmission> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn customizations(&self) -> Vec<CustomizationRequest> {
        self.customizations.lock().unwrap().clone()
    }

    async fn enter(&self, method: &str) -> AppResult<()> {
        self.calls.lock().unwrap().push(method.to_string());
        let gate = self.gate.lock().unwrap().clone();
        match gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }
        let failure = self.failures.lock().unwrap().pop_front();
        failure.map_or(Ok(()), Err)
    }

    fn is_admin(&self) -> bool {
        self.admin.load(Ordering::SeqCst)
    }

    fn require_admin(&self, action: &str) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::remote(format!("Unauthorized: Only admins can {}", action)))
        }
    }
}

#[async_trait]
impl CatalogBackend for FakeCatalog {
    async fn list_products(&self, offset: u64, limit: u64) -> AppResult<PaginatedProducts> {
        self.list_windows.lock().unwrap().push((offset, limit));
        self.enter("listProducts").await?;
        let products = self.products();
        let total = self
            .total_override
            .lock()
            .unwrap()
            .unwrap_or(products.len() as u64);
        let page = products
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(PaginatedProducts { products: page, total })
    }

    async fn get_products(&self, category: Option<String>) -> AppResult<Vec<Product>> {
        self.enter("getProducts").await?;
        Ok(self
            .products()
            .into_iter()
            .filter(|p| category.as_deref().map_or(true, |c| p.category == c))
            .collect())
    }

    async fn get_product_by_id(&self, id: &str) -> AppResult<Product> {
        self.enter("getProductById").await?;
        self.products()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::remote("Product not found"))
    }

    async fn get_featured_products(&self) -> AppResult<Vec<Product>> {
        self.enter("getFeaturedProducts").await?;
        Ok(self.products().into_iter().filter(|p| p.is_active).take(4).collect())
    }

    async fn get_products_grouped_by_category(&self) -> AppResult<Vec<CategoryGroup>> {
        self.enter("getProductsGroupedByCategory").await?;
        let mut groups: Vec<CategoryGroup> = Vec::new();
        for product in self.products() {
            match groups.iter_mut().find(|(name, _)| *name == product.category) {
                Some((_, items)) => items.push(product),
                None => groups.push((product.category.clone(), vec![product])),
            }
        }
        Ok(groups)
    }

    async fn add_product(&self, product: Product) -> AppResult<()> {
        self.enter("addProduct").await?;
        self.require_admin("add products")?;
        let mut products = self.products.lock().unwrap();
        if products.iter().any(|p| p.id == product.id) {
            return Err(AppError::remote("Product with this ID already exists"));
        }
        products.push(product);
        Ok(())
    }

    async fn update_product(&self, id: &str, product: Product) -> AppResult<()> {
        self.enter("updateProduct").await?;
        self.require_admin("update products")?;
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::remote("Product not found"))?;
        *slot = product;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> AppResult<()> {
        self.enter("deleteProduct").await?;
        self.require_admin("delete products")?;
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn get_analytics_summary(&self) -> AppResult<AnalyticsSummary> {
        self.enter("getAnalyticsSummary").await?;
        self.require_admin("view analytics")?;
        let products = self.products();
        let active = products.iter().filter(|p| p.is_active).count() as u64;
        Ok(AnalyticsSummary {
            total_products: products.len() as u64,
            active_products: active,
            inactive_products: products.len() as u64 - active,
            total_contact_submissions: self.contacts.lock().unwrap().len() as u64,
            total_customization_requests: self.customizations.lock().unwrap().len() as u64,
            ..AnalyticsSummary::default()
        })
    }

    async fn submit_contact_form(
        &self,
        submission: ContactFormSubmission,
    ) -> AppResult<Option<String>> {
        self.enter("submitContactForm").await?;
        self.contacts.lock().unwrap().push(submission);
        Ok(self.contact_redirect.lock().unwrap().clone())
    }

    async fn submit_customization_request(&self, request: CustomizationRequest) -> AppResult<()> {
        self.enter("submitCustomizationRequest").await?;
        self.customizations.lock().unwrap().push(request);
        Ok(())
    }

    async fn get_most_recent_contact_form_submissions(
        &self,
        limit: u64,
    ) -> AppResult<Vec<ContactFormSubmission>> {
        self.enter("getMostRecentContactFormSubmissions").await?;
        Ok(self.contacts().into_iter().rev().take(limit as usize).collect())
    }

    async fn get_most_recent_customization_requests(
        &self,
        limit: u64,
    ) -> AppResult<Vec<CustomizationRequest>> {
        self.enter("getMostRecentCustomizationRequests").await?;
        Ok(self.customizations().into_iter().rev().take(limit as usize).collect())
    }

    async fn get_caller_user_profile(&self) -> AppResult<Option<UserProfile>> {
        self.enter("getCallerUserProfile").await?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> AppResult<()> {
        self.enter("saveCallerUserProfile").await?;
        *self.profile.lock().unwrap() = Some(profile);
        Ok(())
    }

    async fn get_user_profile(&self, _principal: &str) -> AppResult<Option<UserProfile>> {
        self.enter("getUserProfile").await?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn get_caller_user_role(&self) -> AppResult<UserRole> {
        self.enter("getCallerUserRole").await?;
        Ok(if self.is_admin() { UserRole::Admin } else { UserRole::User })
    }

    async fn is_caller_admin(&self) -> AppResult<bool> {
        self.enter("isCallerAdmin").await?;
        Ok(self.is_admin())
    }

    async fn assign_caller_user_role(&self, _principal: &str, role: UserRole) -> AppResult<()> {
        self.enter("assignCallerUserRole").await?;
        self.require_admin("assign roles")?;
        self.admin.store(role.is_admin(), Ordering::SeqCst);
        Ok(())
    }
}
