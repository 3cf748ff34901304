//! Price formatting and checkout summary math.

use serde::Serialize;

use crate::model::CartState;

/// Flat shipping fee charged on any non-empty order.
pub const DEFAULT_FLAT_SHIPPING: f64 = 10.0;

/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_price(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Subtotal, shipping, and grand total shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl OrderSummary {
    /// Computes the summary for `cart`; empty carts are not charged shipping.
    pub fn for_cart(cart: &CartState, flat_shipping: f64) -> Self {
        let subtotal = cart.total;
        let shipping = if cart.is_empty() { 0.0 } else { flat_shipping };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartLineItem, ProductId};

    #[test]
    fn format_price_pads_cents_and_groups_thousands() {
        assert_eq!(format_price(35.0), "$35.00");
        assert_eq!(format_price(29.99), "$29.99");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(-5.0), "-$5.00");
    }

    #[test]
    fn summary_adds_shipping_only_for_non_empty_cart() {
        let empty = OrderSummary::for_cart(&CartState::default(), DEFAULT_FLAT_SHIPPING);
        assert_eq!(empty.total, 0.0);

        let cart = CartState::from_items(vec![CartLineItem::new(
            ProductId(1),
            "Tee",
            35.0,
            3,
            "",
        )]);
        let summary = OrderSummary::for_cart(&cart, DEFAULT_FLAT_SHIPPING);
        assert_eq!(summary.subtotal, 105.0);
        assert_eq!(summary.shipping, 10.0);
        assert_eq!(summary.total, 115.0);
    }
}
