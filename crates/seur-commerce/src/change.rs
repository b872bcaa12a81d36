//! Change detection between consecutive cart snapshots.
//!
//! The default comparison is positional: items are compared pairwise by
//! index, so two snapshots holding the same items in a different order are
//! reported as changed. [`ComparisonMode::Keyed`] compares items by SKU
//! instead.

use serde::{Deserialize, Serialize};

use crate::cart::{CartItem, CartSnapshot};
use crate::money::amounts_match;

/// How items are paired when comparing two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Pair items by index; reordering counts as a change.
    #[default]
    Positional,
    /// Pair items by SKU; reordering alone is not a change.
    Keyed,
}

/// Decides whether a freshly extracted snapshot differs from the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    mode: ComparisonMode,
}

impl ChangeDetector {
    /// Create a detector with the given comparison mode.
    pub fn new(mode: ComparisonMode) -> Self {
        Self { mode }
    }

    /// The configured comparison mode.
    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    /// Returns true when `current` differs meaningfully from `previous`.
    ///
    /// Checks short-circuit in order: item count, total (within one cent),
    /// number of lines, then each item pair (SKU, quantity, price within one
    /// cent).
    pub fn has_changed(&self, previous: Option<&CartSnapshot>, current: &CartSnapshot) -> bool {
        let Some(previous) = previous else {
            return true;
        };

        if previous.item_count() != current.item_count() {
            return true;
        }
        if !amounts_match(previous.total(), current.total()) {
            return true;
        }
        if previous.items().len() != current.items().len() {
            return true;
        }

        match self.mode {
            ComparisonMode::Positional => items_differ(previous.items(), current.items()),
            ComparisonMode::Keyed => {
                let mut old: Vec<&CartItem> = previous.items().iter().collect();
                let mut new: Vec<&CartItem> = current.items().iter().collect();
                old.sort_by(|a, b| a.sku.cmp(&b.sku));
                new.sort_by(|a, b| a.sku.cmp(&b.sku));
                old.iter().zip(new.iter()).any(|(a, b)| item_differs(a, b))
            }
        }
    }
}

/// Positional change check; see [`ChangeDetector::has_changed`].
pub fn has_changed(previous: Option<&CartSnapshot>, current: &CartSnapshot) -> bool {
    ChangeDetector::default().has_changed(previous, current)
}

fn items_differ(old: &[CartItem], new: &[CartItem]) -> bool {
    old.iter().zip(new.iter()).any(|(a, b)| item_differs(a, b))
}

fn item_differs(a: &CartItem, b: &CartItem) -> bool {
    a.sku != b.sku || a.quantity != b.quantity || !amounts_match(a.price, b.price)
}
