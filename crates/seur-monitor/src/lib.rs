//! Cart monitoring loop.
//!
//! Every source of "the cart may have changed" (timer ticks, DOM mutation
//! notices, storefront commerce events, pushed snapshots, recalculation
//! requests) is a [`Trigger`] sent through one channel. The [`Monitor`]
//! debounces bursts, re-extracts the cart, gates on the change detector and
//! hands changed snapshots to a [`ShippingQuoter`](seur_estimate::ShippingQuoter).
//! Results are rendered through a [`Presenter`].
//!
//! This crate provides:
//! - `MonitorConfig` - Polling interval, debounce window, comparison mode
//! - `Trigger` / `CommerceEventKind` - Change notifications
//! - `PageSource` - Where page HTML comes from (file, HTTP, memory)
//! - `Presenter` / `PanelView` - Rendering seam
//! - `Monitor` / `MonitorHandle` / `MonitorStatus` - The loop and its controls
//! - `spawn_file_watcher` - Mutation notices when a page file changes

mod config;
mod error;
mod monitor;
mod presenter;
mod source;
mod trigger;
mod watcher;

pub use config::*;
pub use error::*;
pub use monitor::*;
pub use presenter::*;
pub use source::*;
pub use trigger::*;
pub use watcher::*;
