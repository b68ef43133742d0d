// src/integrations/catalog/client.rs
//
// HTTP binding for the remote catalog service
//
// ARCHITECTURE:
// - Every operation is `POST {base}/api/{method}` with `{"args": [...]}`
// - Replies are `{"ok": value}` or `{"err": "message"}`
// - Maps remote failures to AppError, never retries (the cache decides)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never caches, never invalidates

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::backend::CatalogBackend;
use crate::config::StorefrontConfig;
use crate::domain::{
    AnalyticsSummary, CategoryGroup, ContactFormSubmission, CustomizationRequest,
    PaginatedProducts, Product, UserProfile, UserRole,
};
use crate::error::{AppError, AppResult};

/// Reply envelope returned by every remote method
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RpcReply<T> {
    Ok(T),
    Err(String),
}

/// Catalog service client
pub struct HttpCatalogClient {
    base_url: String,
    http_client: Client,
    auth_token: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            auth_token: None,
        })
    }

    pub fn from_config(config: &StorefrontConfig) -> AppResult<Self> {
        let client = Self::new(config.backend_url.clone(), config.request_timeout)?;
        Ok(match &config.auth_token {
            Some(token) => client.with_auth(token.clone()),
            None => client,
        })
    }

    /// Attach the bearer token identifying the caller
    pub fn with_auth(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/api/{}", self.base_url, method)
    }

    async fn call<T>(&self, method: &str, args: Value) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .post(self.endpoint(method))
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.auth_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        log::debug!("catalog call {}", method);

        let response = request.json(&json!({ "args": args })).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(format!(
                "Unauthorized: catalog rejected {} ({})",
                method, status
            )));
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<RpcReply<T>>(&body) {
            Ok(reply) => decode_reply(reply),
            Err(_) if !status.is_success() => Err(AppError::Remote(format!(
                "Catalog returned status {} for {}",
                status, method
            ))),
            Err(e) => Err(AppError::Serialization(format!(
                "Failed to parse {} reply: {}",
                method, e
            ))),
        }
    }
}

fn decode_reply<T>(reply: RpcReply<T>) -> AppResult<T> {
    match reply {
        RpcReply::Ok(value) => Ok(value),
        RpcReply::Err(message) => Err(AppError::remote(message)),
    }
}

#[async_trait]
impl CatalogBackend for HttpCatalogClient {
    async fn list_products(&self, offset: u64, limit: u64) -> AppResult<PaginatedProducts> {
        self.call("listProducts", json!([offset, limit])).await
    }

    async fn get_products(&self, category: Option<String>) -> AppResult<Vec<Product>> {
        self.call("getProducts", json!([category])).await
    }

    async fn get_product_by_id(&self, id: &str) -> AppResult<Product> {
        self.call("getProductById", json!([id])).await
    }

    async fn get_featured_products(&self) -> AppResult<Vec<Product>> {
        self.call("getFeaturedProducts", json!([])).await
    }

    async fn get_products_grouped_by_category(&self) -> AppResult<Vec<CategoryGroup>> {
        self.call("getProductsGroupedByCategory", json!([])).await
    }

    async fn add_product(&self, product: Product) -> AppResult<()> {
        self.call("addProduct", json!([product])).await
    }

    async fn update_product(&self, id: &str, product: Product) -> AppResult<()> {
        self.call("updateProduct", json!([id, product])).await
    }

    async fn delete_product(&self, id: &str) -> AppResult<()> {
        self.call("deleteProduct", json!([id])).await
    }

    async fn get_analytics_summary(&self) -> AppResult<AnalyticsSummary> {
        self.call("getAnalyticsSummary", json!([])).await
    }

    async fn submit_contact_form(
        &self,
        submission: ContactFormSubmission,
    ) -> AppResult<Option<String>> {
        let url: Option<String> = self.call("submitContactForm", json!([submission])).await?;
        Ok(url.filter(|u| !u.trim().is_empty()))
    }

    async fn submit_customization_request(&self, request: CustomizationRequest) -> AppResult<()> {
        self.call("submitCustomizationRequest", json!([request])).await
    }

    async fn get_most_recent_contact_form_submissions(
        &self,
        limit: u64,
    ) -> AppResult<Vec<ContactFormSubmission>> {
        self.call("getMostRecentContactFormSubmissions", json!([limit])).await
    }

    async fn get_most_recent_customization_requests(
        &self,
        limit: u64,
    ) -> AppResult<Vec<CustomizationRequest>> {
        self.call("getMostRecentCustomizationRequests", json!([limit])).await
    }

    async fn get_caller_user_profile(&self) -> AppResult<Option<UserProfile>> {
        self.call("getCallerUserProfile", json!([])).await
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> AppResult<()> {
        self.call("saveCallerUserProfile", json!([profile])).await
    }

    async fn get_user_profile(&self, principal: &str) -> AppResult<Option<UserProfile>> {
        self.call("getUserProfile", json!([principal])).await
    }

    async fn get_caller_user_role(&self) -> AppResult<UserRole> {
        self.call("getCallerUserRole", json!([])).await
    }

    async fn is_caller_admin(&self) -> AppResult<bool> {
        self.call("isCallerAdmin", json!([])).await
    }

    async fn assign_caller_user_role(&self, principal: &str, role: UserRole) -> AppResult<()> {
        self.call("assignCallerUserRole", json!([principal, role])).await
    }
}
