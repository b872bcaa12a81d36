//! Selector configuration.

use serde::{Deserialize, Serialize};

/// Ordered CSS selector lists used to locate cart data on a page.
///
/// Order matters: containers are scanned in list order, and for each field
/// the first selector that matches inside a container wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Selectors for cart-item container elements.
    #[serde(default = "default_containers")]
    pub containers: Vec<String>,

    /// Selectors for the product name inside a container.
    #[serde(default = "default_name")]
    pub name: Vec<String>,

    /// Selectors for the unit price inside a container.
    #[serde(default = "default_price")]
    pub price: Vec<String>,

    /// Selectors for the quantity inside a container.
    #[serde(default = "default_quantity")]
    pub quantity: Vec<String>,

    /// Selectors for the SKU inside a container.
    #[serde(default = "default_sku")]
    pub sku: Vec<String>,

    /// Selectors whose presence marks a cart or checkout page.
    #[serde(default = "default_cart_page")]
    pub cart_page: Vec<String>,

    /// Container attribute holding the product id.
    #[serde(default = "default_product_id_attribute")]
    pub product_id_attribute: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_containers() -> Vec<String> {
    strings(&[".cart-item", "[data-cart-item]", ".sqs-cart-item"])
}

fn default_name() -> Vec<String> {
    strings(&[
        ".item-title",
        ".cart-item-title",
        "[data-item-title]",
        ".product-title",
    ])
}

fn default_price() -> Vec<String> {
    strings(&[
        ".item-price",
        ".cart-item-price",
        "[data-item-price]",
        ".product-price",
    ])
}

fn default_quantity() -> Vec<String> {
    strings(&[
        ".item-quantity",
        ".cart-item-quantity",
        "[data-item-quantity]",
        ".product-quantity",
    ])
}

fn default_sku() -> Vec<String> {
    strings(&[".item-sku", ".cart-item-sku", "[data-item-sku]", ".product-sku"])
}

fn default_cart_page() -> Vec<String> {
    strings(&[
        ".cart-page",
        ".checkout-page",
        "[data-cart-page]",
        ".cart-summary",
        ".order-summary",
    ])
}

fn default_product_id_attribute() -> String {
    "data-product-id".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            containers: default_containers(),
            name: default_name(),
            price: default_price(),
            quantity: default_quantity(),
            sku: default_sku(),
            cart_page: default_cart_page(),
            product_id_attribute: default_product_id_attribute(),
        }
    }
}
