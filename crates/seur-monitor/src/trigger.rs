//! Change notifications.

use std::fmt;
use std::str::FromStr;

use seur_commerce::CartSnapshot;

/// Commerce events raised by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommerceEventKind {
    CartUpdate,
    ItemAdded,
    ItemRemoved,
    QuantityChanged,
}

impl CommerceEventKind {
    /// Storefront event name (e.g. "cart:item:add").
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::CartUpdate => "cart:update",
            Self::ItemAdded => "cart:item:add",
            Self::ItemRemoved => "cart:item:remove",
            Self::QuantityChanged => "cart:item:quantity:change",
        }
    }
}

impl fmt::Display for CommerceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for CommerceEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart:update" => Ok(Self::CartUpdate),
            "cart:item:add" => Ok(Self::ItemAdded),
            "cart:item:remove" => Ok(Self::ItemRemoved),
            "cart:item:quantity:change" => Ok(Self::QuantityChanged),
            other => Err(format!("unknown commerce event '{other}'")),
        }
    }
}

/// Something that may have changed the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Periodic polling tick; runs a pass immediately.
    Tick,
    /// The page DOM changed; debounced.
    Mutation,
    /// The storefront raised a commerce event; debounced.
    CommerceEvent(CommerceEventKind),
    /// A complete snapshot supplied by the host, possibly empty.
    CartPushed(CartSnapshot),
    /// Re-estimate the current snapshot even if it did not change.
    Recalculate,
}

impl Trigger {
    /// Whether this trigger waits for the debounce window.
    pub fn is_debounced(&self) -> bool {
        matches!(self, Self::Mutation | Self::CommerceEvent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_roundtrip() {
        for kind in [
            CommerceEventKind::CartUpdate,
            CommerceEventKind::ItemAdded,
            CommerceEventKind::ItemRemoved,
            CommerceEventKind::QuantityChanged,
        ] {
            assert_eq!(kind.event_name().parse::<CommerceEventKind>(), Ok(kind));
        }
        assert!("page:load".parse::<CommerceEventKind>().is_err());
    }

    #[test]
    fn test_debounced_triggers() {
        assert!(Trigger::Mutation.is_debounced());
        assert!(Trigger::CommerceEvent(CommerceEventKind::ItemAdded).is_debounced());
        assert!(!Trigger::Tick.is_debounced());
        assert!(!Trigger::Recalculate.is_debounced());
    }
}
