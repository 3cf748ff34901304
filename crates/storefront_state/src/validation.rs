//! Schema rules for products entering the recently-viewed list.

use platform_host::Notice;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{ProductId, ProductSummary};

/// Upper bound of the star rating scale.
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Error, Clone, PartialEq)]
/// A product (incoming or stored) failed the recently-viewed schema.
pub enum ValidationError {
    /// The value does not have the product shape at all.
    #[error("malformed product: {0}")]
    Malformed(String),
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has an empty category")]
    EmptyCategory(ProductId),
    #[error("product {product_id} has invalid price {price}")]
    InvalidPrice { product_id: ProductId, price: f64 },
    #[error("product {product_id} has invalid rating {rating}")]
    InvalidRating { product_id: ProductId, rating: f64 },
    #[error("product {0} has no images")]
    NoImages(ProductId),
    #[error("product {product_id} image {image_id} has an empty url")]
    EmptyImageUrl { product_id: ProductId, image_id: u64 },
}

impl ValidationError {
    /// Warning notice shown when a view could not be recorded.
    pub fn notice(&self) -> Notice {
        Notice::warning("Could Not Save Recently Viewed", self.to_string())
    }
}

/// Checks the field rules a decoded product must satisfy.
///
/// # Errors
///
/// Returns the first rule the product violates.
pub fn validate_product(product: &ProductSummary) -> Result<(), ValidationError> {
    let product_id = product.product_id;
    if product.name.trim().is_empty() {
        return Err(ValidationError::EmptyName(product_id));
    }
    if product.category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory(product_id));
    }
    if !product.unit_price.is_finite() || product.unit_price < 0.0 {
        return Err(ValidationError::InvalidPrice {
            product_id,
            price: product.unit_price,
        });
    }
    if !(0.0..=MAX_RATING).contains(&product.rating) {
        return Err(ValidationError::InvalidRating {
            product_id,
            rating: product.rating,
        });
    }
    if product.images.is_empty() {
        return Err(ValidationError::NoImages(product_id));
    }
    if let Some(image) = product.images.iter().find(|image| image.url.trim().is_empty()) {
        return Err(ValidationError::EmptyImageUrl {
            product_id,
            image_id: image.id,
        });
    }
    Ok(())
}

/// Decodes an untyped product value (numeric id, string name/category, numeric rating, image
/// objects with `id`/`url`/`alt`) and validates it.
///
/// # Errors
///
/// Returns [`ValidationError::Malformed`] when decoding fails, or the first violated rule.
pub fn parse_product(value: &Value) -> Result<ProductSummary, ValidationError> {
    let product =
        ProductSummary::deserialize(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate_product(&product)?;
    Ok(product)
}
