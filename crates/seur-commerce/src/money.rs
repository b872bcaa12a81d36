//! Monetary helpers.
//!
//! Prices scraped from the storefront are decimal euro amounts. Two amounts
//! are considered equal when they differ by at most one cent.

/// Absolute tolerance used when comparing monetary amounts.
pub const MONEY_EPSILON: f64 = 0.01;

/// Whether two amounts are equal within [`MONEY_EPSILON`].
pub fn amounts_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= MONEY_EPSILON
}

/// Format an amount with two decimals and a trailing euro sign (e.g. "12.50€").
pub fn format_euros(amount: f64) -> String {
    format!("{:.2}\u{20ac}", amount)
}

/// Format an amount with exactly two decimals and no symbol.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
