//! Local fallback pricing.
//!
//! Used whenever the remote service fails, times out or is not configured:
//!
//! ```text
//! weight = sum(quantity) * unit_weight
//! cost   = base_cost + weight * per_kg_cost   (0 when total >= threshold)
//! ```

use seur_commerce::money::{format_amount, format_euros};
use seur_commerce::{CartSnapshot, EstimateMethod, ShippingEstimate};

use crate::config::{EstimatorConfig, Language};

/// Calculation label carried by local estimates.
pub const FALLBACK_METHOD: &str = "fallback";

/// Compute the deterministic local estimate for `cart`.
pub fn local_estimate(cart: &CartSnapshot, config: &EstimatorConfig) -> ShippingEstimate {
    let rates = &config.rates;
    let threshold = config.free_shipping_threshold;

    let total_weight = cart.item_count() as f64 * rates.unit_weight;
    let raw_cost = rates.base_cost + total_weight * rates.per_kg_cost;
    let is_free = cart.total() >= threshold;
    let remaining = remaining_for_free(cart.total(), threshold);

    ShippingEstimate {
        cost: if is_free { 0.0 } else { raw_cost },
        is_free_shipping: is_free,
        message: shipping_message(config.language, is_free, threshold, remaining),
        total_weight,
        parcel_count: 1,
        method: EstimateMethod::Local,
        calculation_method: FALLBACK_METHOD.to_string(),
        remaining_for_free: remaining,
    }
}

/// Amount still missing to reach `threshold`; never negative.
pub fn remaining_for_free(total: f64, threshold: f64) -> f64 {
    (threshold - total).max(0.0)
}

/// Customer-facing free-shipping or "add X more" message.
pub fn shipping_message(language: Language, is_free: bool, threshold: f64, remaining: f64) -> String {
    match (language, is_free) {
        (Language::Es, true) => format!(
            "\u{a1}Env\u{ed}o gratuito! Tu pedido supera los {}",
            format_euros(threshold)
        ),
        (Language::Es, false) => format!(
            "Env\u{ed}o con costo. A\u{f1}ade {}\u{20ac} m\u{e1}s para env\u{ed}o gratuito",
            format_amount(remaining)
        ),
        (Language::En, true) => format!(
            "Free shipping! Your order exceeds {}",
            format_euros(threshold)
        ),
        (Language::En, false) => format!(
            "Add {}\u{20ac} more for free shipping",
            format_amount(remaining)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seur_commerce::CartItem;

    fn cart(total_price: f64, quantity: u32) -> CartSnapshot {
        let unit = total_price / f64::from(quantity);
        CartSnapshot::from_items(vec![CartItem::new("Item", unit, quantity, "SKU", "P")]).unwrap()
    }

    #[test]
    fn test_below_threshold() {
        let config = EstimatorConfig::default();
        let estimate = local_estimate(&cart(40.0, 2), &config);

        assert!(!estimate.is_free_shipping);
        assert_eq!(estimate.cost, 15.0 + 2.0 * 1.5);
        assert_eq!(estimate.total_weight, 2.0);
        assert_eq!(estimate.parcel_count, 1);
        assert_eq!(estimate.method, EstimateMethod::Local);
        assert_eq!(estimate.calculation_method, "fallback");
        assert!(estimate.message.contains("10.00"));
        assert_eq!(estimate.remaining_for_free, 10.0);
    }

    #[test]
    fn test_above_threshold() {
        let config = EstimatorConfig::default();
        let estimate = local_estimate(&cart(60.0, 3), &config);

        assert!(estimate.is_free_shipping);
        assert_eq!(estimate.cost, 0.0);
        assert_eq!(estimate.remaining_for_free, 0.0);
        assert!(estimate.message.contains("50.00"));
    }

    #[test]
    fn test_exactly_at_threshold_is_free() {
        let estimate = local_estimate(&cart(50.0, 1), &EstimatorConfig::default());
        assert!(estimate.is_free_shipping);
    }

    #[test]
    fn test_custom_threshold_and_rates() {
        let mut config = EstimatorConfig::default().with_threshold(100.0);
        config.rates.unit_weight = 0.5;
        let estimate = local_estimate(&cart(60.0, 4), &config);

        assert!(!estimate.is_free_shipping);
        assert_eq!(estimate.total_weight, 2.0);
        assert_eq!(estimate.cost, 18.0);
        assert!(estimate.message.contains("40.00"));
    }

    #[test]
    fn test_english_messages() {
        assert_eq!(
            shipping_message(Language::En, false, 50.0, 12.5),
            "Add 12.50\u{20ac} more for free shipping"
        );
        assert!(shipping_message(Language::En, true, 50.0, 0.0).starts_with("Free shipping!"));
    }
}
