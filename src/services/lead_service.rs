// src/services/lead_service.rs
//
// Lead Service - contact and customization submissions
//
// Submissions are validated locally, written once (never retried) and
// answered with a WhatsApp link for the follow-up conversation.

use std::sync::Arc;

use crate::cache::{CacheEntry, KeyPattern, QueryCache, QueryKey};
use crate::domain::{
    validate_contact_submission, validate_customization_request, ContactForm,
    ContactFormSubmission, CustomizationRequest, LeadReceipt, Product, WhatsAppLink,
};
use crate::error::AppResult;
use crate::services::query_keys as keys;

pub struct LeadService {
    cache: Arc<QueryCache>,
    whatsapp: WhatsAppLink,
}

impl LeadService {
    pub fn new(cache: Arc<QueryCache>, whatsapp_number: &str) -> Self {
        Self {
            cache,
            whatsapp: WhatsAppLink::new(whatsapp_number),
        }
    }

    pub fn whatsapp(&self) -> &WhatsAppLink {
        &self.whatsapp
    }

    /// Link a shopper opens from a product page
    pub fn product_enquiry_link(&self, product: &Product) -> String {
        self.whatsapp.product_enquiry(product)
    }

    /// The receipt carries the remote service's WhatsApp URL when it returns
    /// one, otherwise a link built from the submission.
    pub async fn submit_contact_form(&self, form: ContactForm) -> AppResult<LeadReceipt> {
        let submission = ContactFormSubmission::from_form(form);
        validate_contact_submission(&submission)?;

        let invalidates = [
            KeyPattern::operation(keys::ANALYTICS_SUMMARY),
            KeyPattern::operation(keys::CONTACT_SUBMISSIONS),
        ];
        let payload = submission.clone();
        let remote_url = self
            .cache
            .write_remote("submitContactForm", &invalidates, |backend| async move {
                backend.submit_contact_form(payload).await
            })
            .await?;

        let whatsapp_url = remote_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.whatsapp.contact(&submission));
        log::info!("contact form {} submitted", submission.id);

        Ok(LeadReceipt {
            submission_id: submission.id,
            whatsapp_url,
        })
    }

    pub async fn submit_customization_request(
        &self,
        request: CustomizationRequest,
    ) -> AppResult<LeadReceipt> {
        validate_customization_request(&request)?;

        let invalidates = [
            KeyPattern::operation(keys::ANALYTICS_SUMMARY),
            KeyPattern::operation(keys::CUSTOMIZATION_REQUESTS),
        ];
        let payload = request.clone();
        self.cache
            .write_remote("submitCustomizationRequest", &invalidates, |backend| async move {
                backend.submit_customization_request(payload).await
            })
            .await?;
        log::info!("customization request {} submitted", request.id);

        Ok(LeadReceipt {
            whatsapp_url: self.whatsapp.customization(&request),
            submission_id: request.id,
        })
    }

    /// Newest first, at most `limit` entries
    pub async fn recent_contact_submissions(
        &self,
        limit: u64,
    ) -> CacheEntry<Vec<ContactFormSubmission>> {
        self.cache
            .read_remote(
                QueryKey::new(keys::CONTACT_SUBMISSIONS).param(limit),
                move |backend| async move {
                    backend.get_most_recent_contact_form_submissions(limit).await
                },
            )
            .await
    }

    /// Newest first, at most `limit` entries
    pub async fn recent_customization_requests(
        &self,
        limit: u64,
    ) -> CacheEntry<Vec<CustomizationRequest>> {
        self.cache
            .read_remote(
                QueryKey::new(keys::CUSTOMIZATION_REQUESTS).param(limit),
                move |backend| async move {
                    backend.get_most_recent_customization_requests(limit).await
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::Session;
    use crate::domain::WoodType;
    use crate::error::AppError;
    use crate::test_support::FakeCatalog;

    fn service_for(fake: &Arc<FakeCatalog>) -> (LeadService, Arc<QueryCache>) {
        let session = Arc::new(Session::connected(fake.clone()));
        let cache = Arc::new(QueryCache::new(session));
        (LeadService::new(Arc::clone(&cache), "+91 98282 88383"), cache)
    }

    fn contact_form() -> ContactForm {
        ContactForm {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            message: "Do you ship to Pune?".into(),
        }
    }

    #[tokio::test]
    async fn test_contact_receipt_falls_back_to_local_link() {
        let fake = Arc::new(FakeCatalog::new());
        let (service, _) = service_for(&fake);

        let receipt = service.submit_contact_form(contact_form()).await.unwrap();

        assert!(receipt.submission_id.starts_with("contact-"));
        assert!(receipt.whatsapp_url.starts_with("https://wa.me/919828288383?text="));
        assert!(receipt.whatsapp_url.contains("Meera"));
        assert_eq!(fake.contacts().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_receipt_prefers_remote_link() {
        let fake = Arc::new(FakeCatalog::new());
        fake.set_contact_redirect("https://wa.me/911234567890?text=hi");
        let (service, _) = service_for(&fake);

        let receipt = service.submit_contact_form(contact_form()).await.unwrap();

        assert_eq!(receipt.whatsapp_url, "https://wa.me/911234567890?text=hi");
    }

    #[tokio::test]
    async fn test_invalid_contact_form_never_reaches_backend() {
        let fake = Arc::new(FakeCatalog::new());
        let (service, _) = service_for(&fake);
        let form = ContactForm {
            email: "not-an-email".into(),
            ..contact_form()
        };

        let result = service.submit_contact_form(form).await;

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert_eq!(fake.calls("submitContactForm"), 0);
    }

    #[tokio::test]
    async fn test_submission_marks_recent_list_stale() {
        let fake = Arc::new(FakeCatalog::new());
        let (service, cache) = service_for(&fake);

        assert_eq!(service.recent_contact_submissions(5).await.value, Some(vec![]));
        service.submit_contact_form(contact_form()).await.unwrap();

        let key = QueryKey::new(keys::CONTACT_SUBMISSIONS).param(5u64);
        assert!(cache.peek::<Vec<ContactFormSubmission>>(&key).unwrap().stale);
        let recent = service.recent_contact_submissions(5).await.value.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn test_customization_request_receipt() {
        let fake = Arc::new(FakeCatalog::new());
        let (service, _) = service_for(&fake);
        let request = CustomizationRequest::new(
            "Arjun",
            "arjun@example.com",
            "+91 90000 00000",
            "Dining Table",
            WoodType::AcaciaWood,
        )
        .with_message("Eight seater, walnut stain");

        let receipt = service.submit_customization_request(request).await.unwrap();

        assert!(receipt.submission_id.starts_with("customization-"));
        assert!(receipt.whatsapp_url.contains("Not%20specified"));
        let stored = fake.customizations();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, CustomizationRequest::PENDING);
        assert_eq!(
            service.recent_customization_requests(10).await.value.map(|r| r.len()),
            Some(1)
        );
    }
}
