use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::product::WoodType;

/// Nanoseconds since the Unix epoch, as the remote service records time
pub type Timestamp = i64;

fn now_nanos() -> Timestamp {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Fields typed into the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product_type: String,
    pub wood_type: WoodType,
    pub dimensions: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_url: Option<String>,
    pub status: String,
    pub timestamp: Timestamp,
}

/// What the view gets back after a lead was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub submission_id: String,
    /// Link that opens WhatsApp with the lead pre-filled
    pub whatsapp_url: String,
}

impl ContactFormSubmission {
    pub fn from_form(form: ContactForm) -> Self {
        let now = Utc::now();
        Self {
            id: format!("contact-{}", now.timestamp_millis()),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            message: form.message.trim().to_string(),
            timestamp: now_nanos(),
        }
    }
}

impl CustomizationRequest {
    pub const PENDING: &'static str = "pending";

    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        product_type: impl Into<String>,
        wood_type: WoodType,
    ) -> Self {
        Self {
            id: format!("customization-{}", Utc::now().timestamp_millis()),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            product_type: product_type.into(),
            wood_type,
            dimensions: String::new(),
            message: String::new(),
            reference_image_url: None,
            status: Self::PENDING.to_string(),
            timestamp: now_nanos(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = dimensions.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_reference_image(mut self, url: impl Into<String>) -> Self {
        self.reference_image_url = Some(url.into());
        self
    }
}
