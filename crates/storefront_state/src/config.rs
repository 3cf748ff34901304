//! Storefront state configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    persistence::{CART_KEY, RECENTLY_VIEWED_KEY},
    pricing::DEFAULT_FLAT_SHIPPING,
};

#[derive(Debug, Error)]
/// Rejected configuration.
pub enum ConfigError {
    #[error("invalid storefront config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{field}` must not be empty")]
    EmptyField { field: &'static str },
    #[error("`cart_key` and `recently_viewed_key` must differ (both are `{0}`)")]
    CollidingKeys(String),
    #[error("`flat_shipping` must be a finite, non-negative amount, got {0}")]
    InvalidShipping(f64),
}

/// Storage and checkout settings for the storefront state core.
///
/// ```toml
/// storage_scope = "shop"
/// cart_key = "cart"
/// recently_viewed_key = "recentlyViewed"
/// flat_shipping = 10.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Optional namespace prefixed to every storage key as `"{scope}.{key}"`.
    pub storage_scope: Option<String>,
    pub cart_key: String,
    pub recently_viewed_key: String,
    /// Shipping fee added to non-empty orders.
    pub flat_shipping: f64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_scope: None,
            cart_key: CART_KEY.to_string(),
            recently_viewed_key: RECENTLY_VIEWED_KEY.to_string(),
            flat_shipping: DEFAULT_FLAT_SHIPPING,
        }
    }
}

impl StorefrontConfig {
    /// Parses and validates a TOML document; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML, unknown fields, or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the stores rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .storage_scope
            .as_deref()
            .is_some_and(|scope| scope.trim().is_empty())
        {
            return Err(ConfigError::EmptyField {
                field: "storage_scope",
            });
        }
        if self.cart_key.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "cart_key" });
        }
        if self.recently_viewed_key.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "recently_viewed_key",
            });
        }
        if self.cart_key == self.recently_viewed_key {
            return Err(ConfigError::CollidingKeys(self.cart_key.clone()));
        }
        if !self.flat_shipping.is_finite() || self.flat_shipping < 0.0 {
            return Err(ConfigError::InvalidShipping(self.flat_shipping));
        }
        Ok(())
    }
}
