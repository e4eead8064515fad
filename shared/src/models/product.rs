//! Product Model

use serde::{Deserialize, Serialize};

use crate::util::{de_i64, de_opt_f64, de_opt_i64};
use crate::Localized;

/// Product-level discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductDiscountType {
    #[default]
    #[serde(alias = "percentage")]
    Percent,
    Fixed,
}

impl ProductDiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductDiscountType::Percent => "percent",
            ProductDiscountType::Fixed => "fixed",
        }
    }
}

impl std::str::FromStr for ProductDiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" | "percentage" => Ok(ProductDiscountType::Percent),
            "fixed" => Ok(ProductDiscountType::Fixed),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

/// Category reference embedded in product detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: Localized,
}

/// Uploaded product image
///
/// The API answers with `{ "id": 9, "attach": "/uploads/rice.png" }`; a bare
/// URL string is also accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImageRepr")]
pub struct ProductImage {
    pub id: Option<i64>,
    pub attach: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRepr {
    Stored {
        #[serde(default, deserialize_with = "de_opt_i64")]
        id: Option<i64>,
        attach: String,
    },
    Url(String),
}

impl From<ImageRepr> for ProductImage {
    fn from(repr: ImageRepr) -> Self {
        match repr {
            ImageRepr::Stored { id, attach } => Self { id, attach },
            ImageRepr::Url(attach) => Self { id: None, attach },
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: Localized,
    #[serde(default)]
    pub description: Option<Localized>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub price: Option<f64>,
    #[serde(
        rename = "price_after_discount",
        default,
        deserialize_with = "de_opt_f64"
    )]
    pub price_after_discount: Option<f64>,
    #[serde(rename = "supplier_price", default, deserialize_with = "de_opt_f64")]
    pub supplier_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub discount: Option<f64>,
    #[serde(rename = "discount_type", default)]
    pub discount_type: Option<ProductDiscountType>,
    #[serde(default, deserialize_with = "de_i64")]
    pub stock: i64,
    /// Images in display order
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub main_category: Option<CategoryRef>,
    #[serde(default)]
    pub sub_category: Option<CategoryRef>,
}

impl Product {
    /// Price shown to customers
    pub fn display_price(&self) -> Option<f64> {
        self.price_after_discount.or(self.price)
    }

    /// Rewrite image paths, e.g. to absolute URLs
    pub fn resolve_assets(&mut self, resolve: &dyn Fn(&str) -> String) {
        for image in &mut self.images {
            image.attach = resolve(&image.attach);
        }
    }

    /// First image, used as the list thumbnail
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(|image| image.attach.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_product_with_string_prices() {
        let json = r#"{
            "id": 3,
            "name": {"en": "Rice", "ar": "أرز"},
            "price": "20.00",
            "price_after_discount": "18.00",
            "discount_type": "percentage",
            "stock": "7",
            "images": [{"id": 9, "attach": "/uploads/rice.png"}, {"id": "10", "attach": "/uploads/rice-2.png"}],
            "isHidden": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.display_price(), Some(18.0));
        assert_eq!(product.discount_type, Some(ProductDiscountType::Percent));
        assert_eq!(product.stock, 7);
        assert!(product.is_hidden);
        assert!(product.main_category.is_none());
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[1].id, Some(10));
        assert_eq!(product.thumbnail(), Some("/uploads/rice.png"));
    }

    #[test]
    fn test_image_accepts_plain_url() {
        let product: Product =
            serde_json::from_str(r#"{"id":3,"name":"Rice","images":["https://cdn/rice.png"]}"#).unwrap();
        assert_eq!(
            product.images,
            vec![ProductImage { id: None, attach: "https://cdn/rice.png".into() }]
        );

        let json = serde_json::to_value(&product.images[0]).unwrap();
        assert_eq!(json, serde_json::json!({"id": null, "attach": "https://cdn/rice.png"}));
    }

    #[test]
    fn test_display_price_falls_back() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"name":"Rice","price":5}"#).unwrap();
        assert_eq!(product.display_price(), Some(5.0));
        assert_eq!("percent".parse::<ProductDiscountType>(), Ok(ProductDiscountType::Percent));
    }
}
