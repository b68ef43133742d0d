use super::entity::{ContactFormSubmission, CustomizationRequest};
use crate::domain::{DomainError, DomainResult};

pub fn validate_contact_submission(submission: &ContactFormSubmission) -> DomainResult<()> {
    required("Name", &submission.name)?;
    required("Message", &submission.message)?;
    email(&submission.email)
}

/// Name, phone, email, product type and message are required;
/// dimensions are optional
pub fn validate_customization_request(request: &CustomizationRequest) -> DomainResult<()> {
    required("Name", &request.name)?;
    required("Phone", &request.phone)?;
    required("Product type", &request.product_type)?;
    required("Message", &request.message)?;
    email(&request.email)
}

fn required(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!("{} is required", field)));
    }
    Ok(())
}

fn email(value: &str) -> DomainResult<()> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::InvariantViolation(format!(
            "Invalid email address: {:?}",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::ContactForm;
    use crate::domain::product::WoodType;

    #[test]
    fn test_contact_requires_valid_email() {
        let mut submission = ContactFormSubmission::from_form(ContactForm {
            name: "Asha".to_string(),
            email: "asha".to_string(),
            message: "Hello".to_string(),
        });
        assert!(validate_contact_submission(&submission).is_err());

        submission.email = "asha@example.com".to_string();
        assert!(validate_contact_submission(&submission).is_ok());
    }

    #[test]
    fn test_customization_requires_message() {
        let request = CustomizationRequest::new("Ravi", "r@example.com", "98", "Sofa", WoodType::LineRange);
        assert!(validate_customization_request(&request).is_err());
        assert!(validate_customization_request(&request.with_message("3 seater")).is_ok());
    }
}
