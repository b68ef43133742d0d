use super::entity::Product;
use crate::domain::{DomainError, DomainResult};

/// Validates all Product invariants
/// These must hold before a product is handed to the remote service
pub fn validate_product(product: &Product) -> DomainResult<()> {
    validate_required("Product id", &product.id)?;
    validate_required("Product name", &product.name)?;
    validate_required("Category", &product.category)?;
    Ok(())
}

fn validate_required(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}

/// Invariants that must hold true for Product domain:
///
/// 1. Identity is assigned at creation and immutable
/// 2. Name and category cannot be empty
/// 3. Image order is display order (first = cover)
/// 4. A product may have no images

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::WoodType;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: "p1".to_string(),
            name: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            wood_type: WoodType::AcaciaWood,
            image_urls: Vec::new(),
            finish_info: String::new(),
            is_active: true,
            whatsapp_message: None,
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(validate_product(&product("Bench", "Benches")).is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        let err = validate_product(&product("  ", "Benches")).unwrap_err();
        assert_eq!(err.to_string(), "Invariant violation: Product name is required");
    }

    #[test]
    fn test_blank_category_fails() {
        assert!(validate_product(&product("Bench", "")).is_err());
    }
}
