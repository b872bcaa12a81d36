//! Snapshot validation errors.

use thiserror::Error;

/// Errors raised when building a [`CartSnapshot`](crate::CartSnapshot) from
/// untrusted item data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Price is not a finite, positive amount.
    #[error("Invalid price for {sku}: {price}")]
    InvalidPrice { sku: String, price: f64 },

    /// Quantity is below one.
    #[error("Invalid quantity for {sku}: {quantity}")]
    InvalidQuantity { sku: String, quantity: u32 },
}
