//! Newtype identifiers for cart items.
//!
//! `Sku` is the identity of an item inside a snapshot; `ProductId` is the
//! storefront's own reference and is only carried through to the pricing
//! service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Stock keeping unit; identity of a cart item.
    Sku
);
define_id!(
    /// External product reference from the storefront.
    ProductId
);

impl Sku {
    /// Placeholder SKU for an item at 1-based `position` that exposes none.
    pub fn positional(position: usize) -> Self {
        Self(format!("ITEM-{position}"))
    }
}

impl ProductId {
    /// Placeholder product id for an item at 1-based `position`.
    pub fn positional(position: usize) -> Self {
        Self(format!("PROD-{position}"))
    }
}
