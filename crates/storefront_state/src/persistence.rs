//! Storage keys and read/write helpers for the persisted storefront values.

use leptos::logging;
use platform_host::{save_pref_with, PersistenceError, PrefsStore};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{CartLineItem, CartState, ProductId, ViewedProduct},
    reducer::is_valid_unit_price,
};

/// Key of the persisted cart snapshot.
pub const CART_KEY: &str = "cart";
/// Key of the persisted recently-viewed list.
pub const RECENTLY_VIEWED_KEY: &str = "recentlyViewed";

/// Stored cart line; decoded one at a time so a bad line does not void the cart.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCartLine {
    #[serde(alias = "id")]
    product_id: ProductId,
    name: String,
    /// `serde_json` writes non-finite floats as `null`.
    #[serde(alias = "price")]
    unit_price: Option<f64>,
    quantity: i64,
    #[serde(alias = "image", default)]
    image_url: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

/// Only `items` is read back; the stored total is recomputed.
#[derive(Deserialize)]
struct StoredCart {
    items: Vec<Value>,
}

/// Loads the persisted cart lines in stored order.
///
/// Lines that do not decode, or carry a quantity below 1 or an invalid price, are dropped with
/// a warning.
///
/// # Errors
///
/// Returns an error when the store read fails or the value is not a cart snapshot.
pub fn load_cart_items(
    prefs: &dyn PrefsStore,
    key: &str,
) -> Result<Option<Vec<CartLineItem>>, PersistenceError> {
    let Some(raw) = prefs.load_pref(key)? else {
        return Ok(None);
    };
    let stored: StoredCart =
        serde_json::from_str(&raw).map_err(|e| PersistenceError::Deserialize(e.to_string()))?;

    let mut items = Vec::with_capacity(stored.items.len());
    for (position, value) in stored.items.iter().enumerate() {
        let line = match StoredCartLine::deserialize(value) {
            Ok(line) => line,
            Err(err) => {
                logging::warn!("dropping undecodable stored cart line {position}: {err}");
                continue;
            }
        };
        let quantity = u32::try_from(line.quantity).ok().filter(|q| *q >= 1);
        let unit_price = line.unit_price.filter(|price| is_valid_unit_price(*price));
        match (quantity, unit_price) {
            (Some(quantity), Some(unit_price)) => items.push(CartLineItem {
                product_id: line.product_id,
                name: line.name,
                unit_price,
                quantity,
                image_url: line.image_url,
                size: line.size,
                color: line.color,
            }),
            _ => logging::warn!(
                "dropping stored cart line for product {} with quantity {} and price {:?}",
                line.product_id,
                line.quantity,
                line.unit_price
            ),
        }
    }
    Ok(Some(items))
}

/// Writes the full cart snapshot.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn persist_cart(
    prefs: &dyn PrefsStore,
    key: &str,
    state: &CartState,
) -> Result<(), PersistenceError> {
    save_pref_with(prefs, key, state)
}

/// Writes the recently-viewed list and returns the text that was stored.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn persist_recently_viewed(
    prefs: &dyn PrefsStore,
    key: &str,
    entries: &[ViewedProduct],
) -> Result<String, PersistenceError> {
    let raw =
        serde_json::to_string(entries).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
    prefs.save_pref(key, &raw)?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn cart_snapshot_has_stable_shape() {
        let prefs = MemoryPrefsStore::default();
        let state = CartState::from_items(vec![CartLineItem::new(
            ProductId(1),
            "Tee",
            35.0,
            3,
            "/tee.jpg",
        )
        .with_size("M")]);
        persist_cart(&prefs, CART_KEY, &state).expect("persist");

        let raw = prefs.load_pref(CART_KEY).expect("load").expect("present");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(
            value,
            json!({
                "items": [{
                    "productId": 1,
                    "name": "Tee",
                    "unitPrice": 35.0,
                    "quantity": 3,
                    "imageUrl": "/tee.jpg",
                    "size": "M"
                }],
                "total": 105.0
            })
        );
    }

    #[test]
    fn load_cart_items_reads_legacy_lines_and_drops_bad_quantities() {
        let prefs = MemoryPrefsStore::default();
        prefs
            .save_pref(
                CART_KEY,
                &json!({
                    "items": [
                        {"id": 1, "name": "Tee", "price": 35, "quantity": 2, "image": "/t.jpg", "color": "Black"},
                        {"id": 2, "name": "Mug", "price": 12, "quantity": 0, "image": "/m.jpg", "color": "White"}
                    ],
                    "total": 999
                })
                .to_string(),
            )
            .expect("seed");

        let items = load_cart_items(&prefs, CART_KEY)
            .expect("load")
            .expect("present");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, ProductId(1));
        assert_eq!(items[0].color.as_deref(), Some("Black"));
        assert_eq!(items[0].image_url, "/t.jpg");
    }

    #[test]
    fn null_price_line_is_dropped_and_valid_lines_survive() {
        let prefs = MemoryPrefsStore::default();
        prefs
            .save_pref(
                CART_KEY,
                &json!({
                    "items": [
                        {"productId": 1, "name": "Tee", "unitPrice": 35.0, "quantity": 2, "imageUrl": "/t.jpg"},
                        {"productId": 9, "name": "Glitch", "unitPrice": null, "quantity": 1, "imageUrl": ""},
                        {"productId": 10, "name": "Half", "quantity": "many"}
                    ],
                    "total": null
                })
                .to_string(),
            )
            .expect("seed");

        let items = load_cart_items(&prefs, CART_KEY)
            .expect("load")
            .expect("present");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, ProductId(1));
        assert_eq!(CartState::from_items(items).total, 70.0);
    }

    #[test]
    fn load_cart_items_reports_corrupt_snapshot() {
        let prefs = MemoryPrefsStore::default();
        prefs.save_pref(CART_KEY, "[1,2,3]").expect("seed");
        assert!(matches!(
            load_cart_items(&prefs, CART_KEY),
            Err(PersistenceError::Deserialize(_))
        ));
        assert_eq!(load_cart_items(&prefs, "absent").expect("load"), None);
    }
}
