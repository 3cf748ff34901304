//! Cart actions, side-effect intents, and transition logic.
//!
//! [`reduce_cart`] is pure: it mutates the supplied [`CartState`] and describes the persistence
//! and notice work as [`CartEffect`] values. [`crate::CartStore`] executes those effects.

use platform_host::Notice;
use thiserror::Error;

use crate::{
    model::{CartLineItem, CartState, LineKey},
    pricing::format_price,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_cart`].
pub enum CartAction {
    /// Merge into the line with the same identity key, or append a new line.
    AddItem(CartLineItem),
    /// Drop the line identified by `key`.
    RemoveItem {
        /// Identity of the line to drop.
        key: LineKey,
    },
    /// Replace the quantity of an existing line.
    UpdateQuantity {
        /// Identity of the line to change.
        key: LineKey,
        /// Requested quantity; must be at least 1.
        quantity: i64,
    },
    /// Reset to the empty cart.
    ClearCart,
    /// Replace all lines with restored ones without notices or persistence.
    Hydrate {
        /// Lines read back from storage.
        items: Vec<CartLineItem>,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_cart`].
pub enum CartEffect {
    /// Persist the full cart snapshot.
    PersistCart,
    /// Surface a user-facing notice.
    Notify(Notice),
}

#[derive(Debug, Error, Clone, PartialEq)]
/// Recoverable rejections; the state is left untouched when one is returned.
pub enum CartError {
    /// The referenced line is not in the cart.
    #[error("{key} is not in the cart")]
    NotFound {
        /// Identity that was looked up.
        key: LineKey,
    },
    /// Quantities must be positive integers.
    #[error("quantity must be at least 1, got {quantity}")]
    InvalidQuantity {
        /// Rejected quantity.
        quantity: i64,
    },
}

impl CartError {
    /// Warning notice describing this rejection to the user.
    pub fn notice(&self) -> Notice {
        match self {
            Self::NotFound { key } => {
                Notice::warning("Item Not Found", format!("{key} is not in your cart"))
            }
            Self::InvalidQuantity { quantity } => Notice::warning(
                "Invalid Quantity",
                format!("Quantity must be at least 1 (requested {quantity})"),
            ),
        }
    }
}

/// Applies a [`CartAction`] to `state` and collects the resulting side effects.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] for quantity updates below 1 and
/// [`CartError::NotFound`] when a remove/update references a missing line. `state` is not
/// modified in either case.
pub fn reduce_cart(state: &mut CartState, action: CartAction) -> Result<Vec<CartEffect>, CartError> {
    let mut effects = Vec::new();
    match action {
        CartAction::AddItem(mut item) => {
            if !is_valid_unit_price(item.unit_price) {
                effects.push(CartEffect::Notify(Notice::warning(
                    "Invalid Price",
                    format!("{} could not be added to your cart", item.name),
                )));
                return Ok(effects);
            }
            item.quantity = item.quantity.max(1);
            let notice = Notice::success("Added to Cart", added_description(&item));
            match state.position(&item.key()) {
                Some(index) => {
                    let line = &mut state.items[index];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                }
                None => state.items.push(item),
            }
            state.recompute_total();
            effects.push(CartEffect::PersistCart);
            effects.push(CartEffect::Notify(notice));
        }
        CartAction::RemoveItem { key } => {
            let index = state.position(&key).ok_or(CartError::NotFound { key })?;
            let removed = state.items.remove(index);
            state.recompute_total();
            effects.push(CartEffect::PersistCart);
            effects.push(CartEffect::Notify(Notice::info(
                "Removed from Cart",
                format!("{} has been removed from your cart", removed.name),
            )));
        }
        CartAction::UpdateQuantity { key, quantity } => {
            let next = u32::try_from(quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or(CartError::InvalidQuantity { quantity })?;
            let index = state.position(&key).ok_or(CartError::NotFound { key })?;
            let line = &mut state.items[index];
            line.quantity = next;
            let notice = Notice::info(
                "Updated Quantity",
                format!("{} quantity updated to {next}", line.name),
            );
            state.recompute_total();
            effects.push(CartEffect::PersistCart);
            effects.push(CartEffect::Notify(notice));
        }
        CartAction::ClearCart => {
            *state = CartState::default();
            effects.push(CartEffect::PersistCart);
            effects.push(CartEffect::Notify(Notice::success(
                "Cart Cleared",
                "All items have been removed from your cart",
            )));
        }
        CartAction::Hydrate { items } => {
            *state = CartState::from_items(items);
        }
    }

    Ok(effects)
}

/// Unit prices must be finite and non-negative.
pub(crate) fn is_valid_unit_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn added_description(item: &CartLineItem) -> String {
    let variant = item.variant_label();
    let price = format_price(item.unit_price);
    if variant.is_empty() {
        format!("{} - {price}", item.name)
    } else {
        format!("{} ({variant}) - {price}", item.name)
    }
}
