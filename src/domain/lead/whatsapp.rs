// src/domain/lead/whatsapp.rs
//
// Pre-filled WhatsApp links (`https://wa.me/<number>?text=<message>`).

use super::entity::{ContactFormSubmission, CustomizationRequest};
use crate::domain::product::Product;

/// Builds links for one business number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLink {
    number: String,
}

impl WhatsAppLink {
    pub fn new(number: impl Into<String>) -> Self {
        let number: String = number.into();
        Self {
            number: number.chars().filter(char::is_ascii_digit).collect(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn with_text(&self, text: &str) -> String {
        format!("https://wa.me/{}?text={}", self.number, urlencoding::encode(text))
    }

    pub fn product_enquiry(&self, product: &Product) -> String {
        self.with_text(&product.enquiry_message())
    }

    pub fn contact(&self, submission: &ContactFormSubmission) -> String {
        self.with_text(&format!(
            "Contact Form Submission\n\nName: {}\nEmail: {}\n\nMessage:\n{}",
            submission.name, submission.email, submission.message
        ))
    }

    pub fn customization(&self, request: &CustomizationRequest) -> String {
        let dimensions = if request.dimensions.trim().is_empty() {
            "Not specified"
        } else {
            request.dimensions.as_str()
        };
        let image_note = if request.reference_image_url.is_some() {
            "\n\nNote: A reference image has been provided."
        } else {
            ""
        };

        self.with_text(&format!(
            "Hello, I'm interested in a customized product.\n\n\
             Customer Details:\nName: {}\nPhone: {}\nEmail: {}\n\n\
             Product Specifications:\nProduct Type: {}\nWood Type: {}\nDimensions: {}\n\n\
             Additional Details:\n{}{}",
            request.name,
            request.phone,
            request.email,
            request.product_type,
            request.wood_type.label(),
            dimensions,
            request.message,
            image_note
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::WoodType;

    #[test]
    fn test_number_is_normalized() {
        let link = WhatsAppLink::new("+91 98282-88383");
        assert_eq!(link.number(), "919828288383");
    }

    #[test]
    fn test_text_is_percent_encoded() {
        let link = WhatsAppLink::new("919828288383");
        assert_eq!(
            link.with_text("Hello, world"),
            "https://wa.me/919828288383?text=Hello%2C%20world"
        );
    }

    #[test]
    fn test_customization_mentions_defaults() {
        let link = WhatsAppLink::new("1");
        let request = CustomizationRequest::new("Ravi", "r@x.io", "98", "Sofa", WoodType::AcaciaWood)
            .with_message("Three seater");
        let url = link.customization(&request);
        assert!(url.contains("Acacia%20Wood"));
        assert!(url.contains("Not%20specified"));
        assert!(!url.contains("reference%20image"));
    }
}
