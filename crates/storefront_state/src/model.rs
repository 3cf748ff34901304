//! Persisted data model for the cart and the recently-viewed list.
//!
//! Field names serialize in camelCase to match the stored `cart` and `recentlyViewed` values.
//! Decoding also accepts the field names written by the earlier storefront build (`id`, `price`,
//! `image`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One purchasable line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: f64,
    pub quantity: u32,
    #[serde(alias = "image", default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartLineItem {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            image_url: image_url.into(),
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Identity of this line: product id plus the chosen variant attributes.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Variant label such as `"M Black"`; empty when no variant was chosen.
    pub fn variant_label(&self) -> String {
        [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Identity key of a cart line: `(product_id, size, color)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "product {}", self.product_id)?;
        let variant = [self.size.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        if !variant.is_empty() {
            write!(f, " ({})", variant.join(", "))?;
        }
        Ok(())
    }
}

/// Lifecycle phase of the cart state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPhase {
    Empty,
    NonEmpty,
}

/// Cart contents in insertion order plus the derived total.
///
/// `total` always equals the sum of `unit_price * quantity` over `items`; it is recomputed by
/// every transition and never trusted from storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
    pub total: f64,
}

impl CartState {
    /// Builds a state from lines, deriving the total.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut state = Self { items, total: 0.0 };
        state.recompute_total();
        state
    }

    pub fn phase(&self) -> CartPhase {
        if self.items.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::NonEmpty
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn find(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(key))
    }

    pub(crate) fn position(&self, key: &LineKey) -> Option<usize> {
        self.items.iter().position(|item| item.matches(key))
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total = compute_total(&self.items);
    }
}

/// Sum of `unit_price * quantity` over `items`, in order.
pub fn compute_total(items: &[CartLineItem]) -> f64 {
    items.iter().map(CartLineItem::line_total).sum()
}

/// One image of a product gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub url: String,
    pub alt: String,
}

/// Product fields the UI hands over when a product page is viewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: f64,
    pub rating: f64,
    pub category: String,
    pub images: Vec<ProductImage>,
}

impl ProductSummary {
    /// Stamps the summary with a view time.
    pub fn viewed_at(self, viewed_at: u64) -> ViewedProduct {
        ViewedProduct {
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            rating: self.rating,
            category: self.category,
            images: self.images,
            viewed_at,
        }
    }
}

/// Entry of the recently-viewed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProduct {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: f64,
    pub rating: f64,
    pub category: String,
    pub images: Vec<ProductImage>,
    /// Unix milliseconds of the most recent view.
    pub viewed_at: u64,
}

impl ViewedProduct {
    /// Strips the view time, yielding the summary shape used for validation.
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            product_id: self.product_id,
            name: self.name.clone(),
            unit_price: self.unit_price,
            rating: self.rating,
            category: self.category.clone(),
            images: self.images.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tee() -> CartLineItem {
        CartLineItem::new(ProductId(1), "Tee", 35.0, 1, "/tee.jpg")
            .with_size("M")
            .with_color("Black")
    }

    #[test]
    fn cart_line_serializes_with_camel_case_and_skips_missing_variants() {
        let plain = CartLineItem::new(ProductId(2), "Mug", 12.5, 2, "/mug.jpg");
        assert_eq!(
            serde_json::to_value(&plain).expect("serialize"),
            json!({
                "productId": 2,
                "name": "Mug",
                "unitPrice": 12.5,
                "quantity": 2,
                "imageUrl": "/mug.jpg"
            })
        );
    }

    #[test]
    fn cart_line_accepts_legacy_field_names() {
        let line: CartLineItem = serde_json::from_value(json!({
            "id": 1,
            "name": "Tee",
            "price": 35,
            "quantity": 1,
            "image": "/tee.jpg",
            "size": "M",
            "color": "Black"
        }))
        .expect("decode legacy line");
        assert_eq!(line, tee());
    }

    #[test]
    fn identity_key_includes_variants() {
        let black = tee();
        let white = tee().with_color("White");
        assert_ne!(black.key(), white.key());
        assert!(black.matches(&LineKey::new(ProductId(1)).with_size("M").with_color("Black")));
        assert!(!black.matches(&LineKey::new(ProductId(1))));
    }

    #[test]
    fn variant_label_and_key_display() {
        assert_eq!(tee().variant_label(), "M Black");
        assert_eq!(
            CartLineItem::new(ProductId(3), "Lamp", 1.0, 1, "").variant_label(),
            ""
        );
        assert_eq!(tee().key().to_string(), "product 1 (M, Black)");
        assert_eq!(LineKey::new(ProductId(9)).to_string(), "product 9");
    }

    #[test]
    fn state_derives_total_count_and_phase() {
        let state = CartState::from_items(vec![
            CartLineItem { quantity: 3, ..tee() },
            CartLineItem::new(ProductId(2), "Mug", 12.5, 2, "/mug.jpg"),
        ]);
        assert_eq!(state.total, 130.0);
        assert_eq!(state.item_count(), 5);
        assert_eq!(state.phase(), CartPhase::NonEmpty);
        assert_eq!(CartState::default().phase(), CartPhase::Empty);
    }
}
