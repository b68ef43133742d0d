use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProductId = String;

/// A catalog entry as stored by the remote service.
///
/// Image order is display order; the first image is the cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned at creation, never changed afterwards
    pub id: ProductId,

    pub name: String,

    pub description: String,

    /// Free-text label ("Side Tables", "Chairs", ...)
    pub category: String,

    pub wood_type: WoodType,

    /// Encoded image buffers, cover first
    pub image_urls: Vec<Vec<u8>>,

    /// Finish / material note
    pub finish_info: String,

    /// Controls public visibility
    pub is_active: bool,

    /// Custom outreach message used for the WhatsApp enquiry link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_message: Option<String>,
}

/// Material line a product belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WoodType {
    #[default]
    MangoWood,
    AcaciaWood,
    LineRange,
    CustomisedProducts,
}

/// One window of the catalog plus the total matching at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedProducts {
    pub products: Vec<Product>,
    pub total: u64,
}

impl Product {
    /// Fresh identifier in the `product_<millis>_<random>` shape.
    pub fn generate_id() -> ProductId {
        let millis = chrono::Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        format!("product_{}_{}", millis, &random[..7])
    }

    pub fn cover_image(&self) -> Option<&[u8]> {
        self.image_urls.first().map(Vec::as_slice)
    }

    /// Message pre-filled into a WhatsApp enquiry for this product.
    pub fn enquiry_message(&self) -> String {
        match self.whatsapp_message.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => format!(
                "Hello, I'm interested in the {}. Could you please provide more details?",
                self.name
            ),
        }
    }
}

impl WoodType {
    pub const ALL: [WoodType; 4] = [
        WoodType::MangoWood,
        WoodType::AcaciaWood,
        WoodType::LineRange,
        WoodType::CustomisedProducts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WoodType::MangoWood => "Mango Wood",
            WoodType::AcaciaWood => "Acacia Wood",
            WoodType::LineRange => "Line Range",
            WoodType::CustomisedProducts => "Customised Products",
        }
    }
}

impl std::fmt::Display for WoodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WoodType::MangoWood => write!(f, "mangoWood"),
            WoodType::AcaciaWood => write!(f, "acaciaWood"),
            WoodType::LineRange => write!(f, "lineRange"),
            WoodType::CustomisedProducts => write!(f, "customisedProducts"),
        }
    }
}

impl std::str::FromStr for WoodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WoodType::ALL
            .into_iter()
            .find(|w| w.to_string() == s || w.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown wood type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Product {
        Product {
            id: "p9_10".to_string(),
            name: "Mango Wood Side Table".to_string(),
            description: String::new(),
            category: "Side Tables".to_string(),
            wood_type: WoodType::MangoWood,
            image_urls: vec![vec![1, 2], vec![3]],
            finish_info: String::new(),
            is_active: true,
            whatsapp_message: None,
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Product::generate_id();
        let b = Product::generate_id();
        assert!(a.starts_with("product_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_cover_is_first_image() {
        assert_eq!(table().cover_image(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_default_enquiry_message() {
        assert_eq!(
            table().enquiry_message(),
            "Hello, I'm interested in the Mango Wood Side Table. Could you please provide more details?"
        );
    }

    #[test]
    fn test_custom_enquiry_message_wins() {
        let mut product = table();
        product.whatsapp_message = Some("Is this available in teak?".to_string());
        assert_eq!(product.enquiry_message(), "Is this available in teak?");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["woodType"], "mangoWood");
        assert_eq!(json["isActive"], true);
        assert!(json.get("whatsappMessage").is_none());
    }

    #[test]
    fn test_wood_type_parses_wire_and_label() {
        assert_eq!("lineRange".parse::<WoodType>().unwrap(), WoodType::LineRange);
        assert_eq!("acacia wood".parse::<WoodType>().unwrap(), WoodType::AcaciaWood);
        assert!("teak".parse::<WoodType>().is_err());
    }
}
