//! Client-side state core for the storefront: the shopping cart, the recently-viewed product
//! list, and their persistence through the host key-value store.

pub mod cart;
pub mod config;
pub mod model;
pub mod persistence;
pub mod pricing;
pub mod recently_viewed;
pub mod reducer;
pub mod runtime_context;
pub mod storefront;
pub mod validation;

pub use cart::{CartStore, SubscriptionId};
pub use config::{ConfigError, StorefrontConfig};
pub use model::*;
pub use persistence::{
    load_cart_items, persist_cart, persist_recently_viewed, CART_KEY, RECENTLY_VIEWED_KEY,
};
pub use pricing::{format_price, OrderSummary, DEFAULT_FLAT_SHIPPING};
pub use recently_viewed::{RecentlyViewedCache, RecentlyViewedList, RECENTLY_VIEWED_CAPACITY};
pub use reducer::{reduce_cart, CartAction, CartEffect, CartError};
pub use runtime_context::{StorefrontRuntime, Toast, MAX_VISIBLE_TOASTS};
pub use storefront::Storefront;
pub use validation::{parse_product, validate_product, ValidationError};
