//! Ordered migrator chain for stored recently-viewed entries.
//!
//! Each migrator recognizes one stored shape and produces a current [`ViewedProduct`]. The
//! chain is tried in order per entry; an entry no migrator accepts, or whose result fails
//! validation, is dropped.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{ProductId, ProductImage, ViewedProduct},
    validation::validate_product,
};

/// Alt text used when a legacy entry carries no description for its single image.
pub const LEGACY_IMAGE_ALT_FALLBACK: &str = "Product image";

/// Per-entry inputs shared by every migrator.
#[derive(Debug, Clone, Copy)]
pub struct MigrationContext {
    /// Reference time for synthetic `viewed_at` values.
    pub anchor_ms: u64,
    /// Index of the entry in the stored array.
    pub position: usize,
}

impl MigrationContext {
    /// Synthetic view time for entries stored without one; earlier positions are more recent.
    pub fn synthetic_viewed_at(&self) -> u64 {
        self.anchor_ms.saturating_sub(self.position as u64)
    }
}

/// A migrator returns `None` when the entry is not in its shape.
pub type Migrator = fn(&Value, MigrationContext) -> Option<ViewedProduct>;

/// Migrators in priority order.
pub const MIGRATION_CHAIN: &[(&str, Migrator)] = &[
    ("current", migrate_current),
    ("legacy-single-image", migrate_legacy_single_image),
];

/// Outcome of running the chain over a stored array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Entries that survived, in stored order.
    pub entries: Vec<ViewedProduct>,
    /// Number of entries rewritten by a non-current migrator.
    pub migrated: usize,
    /// Number of entries dropped.
    pub discarded: usize,
}

/// Runs the chain over every stored entry.
pub fn migrate_entries(stored: &[Value], anchor_ms: u64) -> MigrationReport {
    let mut report = MigrationReport::default();
    for (position, value) in stored.iter().enumerate() {
        let ctx = MigrationContext {
            anchor_ms,
            position,
        };
        let migrated = MIGRATION_CHAIN
            .iter()
            .enumerate()
            .find_map(|(step, (_, migrator))| migrator(value, ctx).map(|entry| (step, entry)));

        match migrated {
            Some((step, entry)) if validate_product(&entry.summary()).is_ok() => {
                if step > 0 {
                    report.migrated += 1;
                }
                report.entries.push(entry);
            }
            _ => report.discarded += 1,
        }
    }
    report
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentEntry {
    #[serde(alias = "id")]
    product_id: ProductId,
    name: String,
    #[serde(alias = "price")]
    unit_price: f64,
    rating: f64,
    category: String,
    images: Vec<ProductImage>,
    #[serde(default)]
    viewed_at: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEntry {
    #[serde(alias = "id")]
    product_id: ProductId,
    name: String,
    #[serde(alias = "price")]
    unit_price: f64,
    rating: f64,
    category: String,
    image: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    viewed_at: Option<u64>,
}

/// Accepts entries already in the multi-image shape.
pub fn migrate_current(value: &Value, ctx: MigrationContext) -> Option<ViewedProduct> {
    value.get("images")?;
    let entry = CurrentEntry::deserialize(value).ok()?;
    Some(ViewedProduct {
        product_id: entry.product_id,
        name: entry.name,
        unit_price: entry.unit_price,
        rating: entry.rating,
        category: entry.category,
        images: entry.images,
        viewed_at: entry
            .viewed_at
            .unwrap_or_else(|| ctx.synthetic_viewed_at()),
    })
}

/// Rewrites the single-image shape (`image: "<url>"`) into a one-image gallery.
pub fn migrate_legacy_single_image(value: &Value, ctx: MigrationContext) -> Option<ViewedProduct> {
    if value.get("images").is_some() {
        return None;
    }
    let entry = LegacyEntry::deserialize(value).ok()?;
    let alt = entry
        .description
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| LEGACY_IMAGE_ALT_FALLBACK.to_string());
    Some(ViewedProduct {
        product_id: entry.product_id,
        name: entry.name,
        unit_price: entry.unit_price,
        rating: entry.rating,
        category: entry.category,
        images: vec![ProductImage {
            id: legacy_image_id(entry.product_id),
            url: entry.image,
            alt,
        }],
        viewed_at: entry
            .viewed_at
            .unwrap_or_else(|| ctx.synthetic_viewed_at()),
    })
}

/// Catalog convention: the first image of product `n` has id `n * 1000 + 1`.
fn legacy_image_id(product_id: ProductId) -> u64 {
    product_id.0.saturating_mul(1000).saturating_add(1)
}
