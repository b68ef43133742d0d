use serde::{Deserialize, Serialize};

use crate::domain::lead::{ContactFormSubmission, CustomizationRequest};
use crate::domain::product::Product;

/// Category label with the products filed under it
pub type CategoryGroup = (String, Vec<Product>);

/// Read-only aggregate shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_products: u64,
    pub active_products: u64,
    pub inactive_products: u64,
    pub total_contact_submissions: u64,
    pub total_customization_requests: u64,
    pub recent_contact_submissions: Vec<ContactFormSubmission>,
    pub recent_customization_requests: Vec<CustomizationRequest>,
    pub products_by_category: Vec<CategoryGroup>,
}

impl AnalyticsSummary {
    pub fn total_leads(&self) -> u64 {
        self.total_contact_submissions + self.total_customization_requests
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.products_by_category
            .iter()
            .find(|(name, _)| name == category)
            .map_or(0, |(_, products)| products.len())
    }
}
