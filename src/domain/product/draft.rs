// src/domain/product/draft.rs
//
// Admin form state for adding or editing a product.
//
// A draft is loosely filled in by the admin. It only becomes a
// `ProductSubmission` through `submit`, which trims, validates and
// assigns the identifier.

use super::entity::{Product, ProductId, WoodType};
use super::invariants::validate_product;
use crate::domain::DomainResult;

/// In-progress product form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Set when editing an existing product
    pub editing: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub wood_type: WoodType,
    pub finish_info: String,
    pub is_active: bool,
    /// Blank means "use the default enquiry message"
    pub whatsapp_message: String,
    /// Images already stored on the product, kept in display order
    pub existing_images: Vec<Vec<u8>>,
    /// Newly compressed images, appended after the existing ones
    pub new_images: Vec<Vec<u8>>,
}

/// A validated product ready to be sent to the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSubmission {
    Create(Product),
    Update { id: ProductId, product: Product },
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            description: String::new(),
            category: String::new(),
            wood_type: WoodType::default(),
            finish_info: String::new(),
            is_active: true,
            whatsapp_message: String::new(),
            existing_images: Vec::new(),
            new_images: Vec::new(),
        }
    }
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// New product pre-filled with a category (category pages lock it)
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            editing: Some(product.id.clone()),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            wood_type: product.wood_type,
            finish_info: product.finish_info.clone(),
            is_active: product.is_active,
            whatsapp_message: product.whatsapp_message.clone().unwrap_or_default(),
            existing_images: product.image_urls.clone(),
            new_images: Vec::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn remove_existing_image(&mut self, index: usize) -> Option<Vec<u8>> {
        (index < self.existing_images.len()).then(|| self.existing_images.remove(index))
    }

    pub fn remove_new_image(&mut self, index: usize) -> Option<Vec<u8>> {
        (index < self.new_images.len()).then(|| self.new_images.remove(index))
    }

    /// Validate at the submit boundary and build the product.
    pub fn submit(self) -> DomainResult<ProductSubmission> {
        let whatsapp_message = Some(self.whatsapp_message.trim().to_string())
            .filter(|message| !message.is_empty());

        let mut image_urls = self.existing_images;
        image_urls.extend(self.new_images);

        let id = self.editing.clone().unwrap_or_else(Product::generate_id);

        let product = Product {
            id: id.clone(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            wood_type: self.wood_type,
            image_urls,
            finish_info: self.finish_info.trim().to_string(),
            is_active: self.is_active,
            whatsapp_message,
        };

        validate_product(&product)?;

        Ok(match self.editing {
            Some(_) => ProductSubmission::Update { id, product },
            None => ProductSubmission::Create(product),
        })
    }
}

impl ProductSubmission {
    pub fn product(&self) -> &Product {
        match self {
            ProductSubmission::Create(product) => product,
            ProductSubmission::Update { product, .. } => product,
        }
    }

    pub fn id(&self) -> &str {
        &self.product().id
    }
}
