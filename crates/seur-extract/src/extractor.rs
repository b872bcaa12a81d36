//! Cart extractor.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use seur_commerce::{CartItem, CartSnapshot, ProductId, Sku};
use tracing::{debug, warn};

use crate::config::SelectorConfig;
use crate::error::{ExtractError, ItemRejection};
use crate::parse::{parse_price, parse_quantity};
use crate::probe::{compile, element_text, ProbeChain};

/// A container that was skipped during extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedItem {
    /// Container selector that matched the element.
    pub container: String,
    /// Why the element was skipped.
    pub reason: ItemRejection,
}

/// Full result of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Snapshot, or `None` when no item could be read.
    pub snapshot: Option<CartSnapshot>,
    /// Containers that were found but dropped.
    pub rejected: Vec<RejectedItem>,
    /// Whether any cart-page indicator matched.
    pub is_cart_page: bool,
}

/// Builds cart snapshots from storefront HTML.
///
/// All selectors are compiled once at construction.
#[derive(Debug)]
pub struct CartExtractor {
    containers: Vec<(String, Selector)>,
    name: ProbeChain,
    price: ProbeChain,
    quantity: ProbeChain,
    sku: ProbeChain,
    cart_page: Vec<Selector>,
    product_id_attribute: String,
}

impl CartExtractor {
    /// Compile an extractor from selector configuration.
    pub fn new(config: &SelectorConfig) -> Result<Self, ExtractError> {
        if config.containers.is_empty() {
            return Err(ExtractError::NoContainers);
        }

        let containers = config
            .containers
            .iter()
            .map(|css| compile(css).map(|sel| (css.clone(), sel)))
            .collect::<Result<Vec<_>, _>>()?;

        let cart_page = config
            .cart_page
            .iter()
            .map(|css| compile(css))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            containers,
            name: ProbeChain::from_selectors(&config.name)?,
            price: ProbeChain::from_selectors(&config.price)?,
            quantity: ProbeChain::from_selectors(&config.quantity)?,
            sku: ProbeChain::from_selectors(&config.sku)?,
            cart_page,
            product_id_attribute: config.product_id_attribute.clone(),
        })
    }

    /// Extract a snapshot from a parsed document.
    ///
    /// Returns `None` when no cart item could be read anywhere on the page.
    /// That means "no cart here", which is not the same as an empty cart.
    pub fn extract(&self, document: &Html) -> Option<CartSnapshot> {
        self.extract_report(document).snapshot
    }

    /// Parse `html` and extract a snapshot from it.
    pub fn extract_str(&self, html: &str) -> Option<CartSnapshot> {
        self.extract(&Html::parse_document(html))
    }

    /// Extract a snapshot and keep track of dropped containers.
    pub fn extract_report(&self, document: &Html) -> ExtractionReport {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut rejected = Vec::new();

        for (css, selector) in &self.containers {
            for element in document.select(selector) {
                // Elements matching several container selectors count once.
                if !seen.insert(element.id()) {
                    continue;
                }

                match self.extract_item(element, items.len() + 1) {
                    Ok(item) => items.push(item),
                    Err(reason) => {
                        debug!(container = %css, reason = %reason, "dropping cart item");
                        rejected.push(RejectedItem {
                            container: css.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        let snapshot = if items.is_empty() {
            debug!(rejected = rejected.len(), "no cart items found on page");
            None
        } else {
            match CartSnapshot::from_items(items) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, "extracted items failed snapshot validation");
                    None
                }
            }
        };

        ExtractionReport {
            snapshot,
            rejected,
            is_cart_page: self.is_cart_page(document),
        }
    }

    /// Read one item from a container element.
    ///
    /// `position` is the 1-based index the item would take in the snapshot;
    /// it seeds placeholder SKU and product ids.
    pub fn extract_item(
        &self,
        container: ElementRef<'_>,
        position: usize,
    ) -> Result<CartItem, ItemRejection> {
        let name = self.name.text(container).ok_or(ItemRejection::MissingName)?;
        let price_text = self.price.text(container).ok_or(ItemRejection::MissingPrice)?;

        let price = parse_price(&price_text)
            .ok_or_else(|| ItemRejection::UnparsablePrice(price_text.clone()))?;
        if price <= 0.0 {
            return Err(ItemRejection::NonPositivePrice(price));
        }

        let quantity = match self.quantity.first_match(container) {
            Some(element) => {
                let text = element_text(element);
                parse_quantity(&text).ok_or(ItemRejection::UnparsableQuantity(text))?
            }
            None => 1,
        };

        let sku = self
            .sku
            .text(container)
            .filter(|s| !s.is_empty())
            .map(Sku::new)
            .unwrap_or_else(|| Sku::positional(position));

        let product_id = container
            .value()
            .attr(&self.product_id_attribute)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ProductId::new)
            .unwrap_or_else(|| ProductId::positional(position));

        Ok(CartItem {
            name,
            price,
            quantity,
            sku,
            product_id,
        })
    }

    /// Check if the document looks like a cart or checkout page.
    pub fn is_cart_page(&self, document: &Html) -> bool {
        self.cart_page
            .iter()
            .any(|sel| document.select(sel).next().is_some())
    }
}
