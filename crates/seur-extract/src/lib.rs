//! Cart extraction from storefront HTML.
//!
//! The extractor walks an ordered list of cart-item container selectors and,
//! inside every container, probes ordered selector chains for the name,
//! price, quantity and SKU of the item. The first probe that matches wins.
//!
//! This crate provides:
//! - `SelectorConfig` - The selector lists, with storefront defaults
//! - `Probe` / `ProbeChain` - First-match element lookup strategies
//! - `CartExtractor` - Builds a `CartSnapshot` from a parsed document
//! - `parse_price` / `parse_quantity` - Text parsing rules

mod config;
mod error;
mod extractor;
mod parse;
mod probe;

pub use config::*;
pub use error::*;
pub use extractor::*;
pub use parse::*;
pub use probe::*;

pub use scraper::Html;
