//! Rendering seam between the monitor and whatever displays results.

use seur_commerce::{CartSnapshot, ShippingEstimate};

/// What the estimate panel should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelView<'a> {
    /// An estimate for `snapshot` is being computed.
    Calculating { snapshot: &'a CartSnapshot },
    /// A finished estimate for `snapshot`.
    Estimate {
        snapshot: &'a CartSnapshot,
        estimate: &'a ShippingEstimate,
    },
    /// The cart is empty; nothing to estimate.
    EmptyCart,
}

/// Receives panel updates from the monitor.
pub trait Presenter {
    fn render(&mut self, view: PanelView<'_>);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn render(&mut self, view: PanelView<'_>) {
        (**self).render(view)
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _view: PanelView<'_>) {}
}
