//! Catalog products.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A product as served by the catalog API.
///
/// Products are immutable once loaded. `price` is `None` for priceless
/// items, which the storefront displays but cannot sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Image path relative to the CDN root (e.g., `/Shell.svg`).
    pub image: String,
    pub category: Category,
    pub price: Option<Price>,
}

impl Product {
    /// Whether the product has no price.
    #[must_use]
    pub const fn is_priceless(&self) -> bool {
        self.price.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_product() {
        let json = r#"{
            "id": "b06cde61-912f-4663-9751-09956c0eed67",
            "description": "Будет стоять над душой и не давать прокрастинировать.",
            "image": "/Asterisk_2.svg",
            "title": "Мамка-таймер",
            "category": "софт-скил",
            "price": null
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "b06cde61-912f-4663-9751-09956c0eed67");
        assert_eq!(product.category, Category::SoftSkill);
        assert!(product.is_priceless());
    }
}
