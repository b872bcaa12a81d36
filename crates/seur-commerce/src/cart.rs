//! Cart items and point-in-time cart snapshots.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::ids::{ProductId, Sku};

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product name as shown on the page.
    pub name: String,
    /// Unit price in euros.
    pub price: f64,
    /// Units of this item; at least one.
    pub quantity: u32,
    /// Item identity within a snapshot.
    pub sku: Sku,
    /// Storefront product reference.
    pub product_id: ProductId,
}

impl CartItem {
    /// Create a new cart item.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        quantity: u32,
        sku: impl Into<Sku>,
        product_id: impl Into<ProductId>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            sku: sku.into(),
            product_id: product_id.into(),
        }
    }

    /// Price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(SnapshotError::InvalidPrice {
                sku: self.sku.to_string(),
                price: self.price,
            });
        }
        if self.quantity < 1 {
            return Err(SnapshotError::InvalidQuantity {
                sku: self.sku.to_string(),
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}

/// Immutable view of the cart at one moment.
///
/// `total` and `item_count` are always derived from `items`; the only way to
/// build a snapshot is [`CartSnapshot::from_items`], which deserialization
/// also goes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SnapshotPayload")]
pub struct CartSnapshot {
    items: Vec<CartItem>,
    total: f64,
    item_count: u64,
}

impl CartSnapshot {
    /// Build a snapshot, validating every item and deriving the totals.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, SnapshotError> {
        for item in &items {
            item.validate()?;
        }

        let total = items.iter().map(CartItem::line_total).sum();
        let item_count = items.iter().map(|i| u64::from(i.quantity)).sum();

        Ok(Self {
            items,
            total,
            item_count,
        })
    }

    /// An explicitly empty cart.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0.0,
            item_count: 0,
        }
    }

    /// Items in page order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of price times quantity over all items.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of quantities over all items.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Check if the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the snapshot and return its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wire shape accepted when deserializing; any `total` or `itemCount` in the
/// payload is ignored and recomputed.
#[derive(Deserialize)]
struct SnapshotPayload {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl TryFrom<SnapshotPayload> for CartSnapshot {
    type Error = SnapshotError;

    fn try_from(payload: SnapshotPayload) -> Result<Self, Self::Error> {
        CartSnapshot::from_items(payload.items)
    }
}
