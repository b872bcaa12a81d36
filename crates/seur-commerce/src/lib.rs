//! Cart and shipping domain types for the SEUR shipping estimator.
//!
//! This crate provides the values that flow between the extractor, the
//! estimator and the presentation layer:
//!
//! - **Cart**: `CartItem` and the derived-total `CartSnapshot`
//! - **Shipping**: `ShippingEstimate`, `EstimateMethod`, `ShippingAddress`
//! - **Change detection**: `has_changed` and the configurable `ChangeDetector`
//!
//! # Example
//!
//! ```rust
//! use seur_commerce::prelude::*;
//!
//! let snapshot = CartSnapshot::from_items(vec![
//!     CartItem::new("Camiseta", 12.5, 2, "TSHIRT-M", "PROD-1"),
//! ])
//! .unwrap();
//!
//! assert_eq!(snapshot.item_count(), 2);
//! assert!(has_changed(None, &snapshot));
//! assert!(!has_changed(Some(&snapshot), &snapshot));
//! ```

pub mod address;
pub mod cart;
pub mod change;
pub mod error;
pub mod estimate;
pub mod ids;
pub mod money;

pub use address::ShippingAddress;
pub use cart::{CartItem, CartSnapshot};
pub use change::{has_changed, ChangeDetector, ComparisonMode};
pub use error::SnapshotError;
pub use estimate::{EstimateMethod, ShippingEstimate};
pub use ids::{ProductId, Sku};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::address::ShippingAddress;
    pub use crate::cart::{CartItem, CartSnapshot};
    pub use crate::change::{has_changed, ChangeDetector, ComparisonMode};
    pub use crate::error::SnapshotError;
    pub use crate::estimate::{EstimateMethod, ShippingEstimate};
    pub use crate::ids::{ProductId, Sku};
    pub use crate::money::{amounts_match, format_euros, MONEY_EPSILON};
}
