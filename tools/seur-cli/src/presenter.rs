//! Terminal rendering of the estimate panel.

use seur_commerce::money::{format_amount, format_euros};
use seur_estimate::Language;
use seur_monitor::{PanelView, Presenter};

use crate::config::DisplayConfig;
use crate::output::{method_badge, Output};

struct Labels {
    title: &'static str,
    calculating: &'static str,
    empty: &'static str,
    empty_hint: &'static str,
    cost: &'static str,
    free: &'static str,
    weight: &'static str,
    parcels: &'static str,
    method: &'static str,
    products: &'static str,
}

const ES: Labels = Labels {
    title: "Envío SEUR",
    calculating: "Calculando envío con SEUR...",
    empty: "Tu carrito está vacío",
    empty_hint: "Agrega productos para calcular el envío",
    cost: "Costo de envío",
    free: "GRATIS",
    weight: "Peso total",
    parcels: "Bultos",
    method: "Método",
    products: "Productos en el carrito:",
};

const EN: Labels = Labels {
    title: "SEUR shipping",
    calculating: "Calculating SEUR shipping...",
    empty: "Your cart is empty",
    empty_hint: "Add products to calculate shipping",
    cost: "Shipping cost",
    free: "FREE",
    weight: "Total weight",
    parcels: "Parcels",
    method: "Method",
    products: "Products in cart:",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Es => &ES,
        Language::En => &EN,
    }
}

/// Panel title for `language`.
pub fn panel_title(language: Language) -> &'static str {
    labels(language).title
}

/// Plain-text lines for a panel view.
pub fn panel_lines(view: PanelView<'_>, display: DisplayConfig, language: Language) -> Vec<String> {
    let labels = labels(language);
    match view {
        PanelView::Calculating { .. } => vec![labels.calculating.to_string()],
        PanelView::EmptyCart => vec![labels.empty.to_string(), labels.empty_hint.to_string()],
        PanelView::Estimate { snapshot, estimate } => {
            let cost = if estimate.is_free_shipping {
                labels.free.to_string()
            } else {
                format_euros(estimate.cost)
            };
            let mut lines = vec![format!("{}: {}", labels.cost, cost), estimate.message.clone()];

            if display.show_shipping_details && estimate.total_weight > 0.0 {
                lines.push(format!("{}: {}kg", labels.weight, estimate.total_weight));
                lines.push(format!("{}: {}", labels.parcels, estimate.parcel_count));
                lines.push(format!("{}: {}", labels.method, estimate.calculation_method));
            }

            if display.show_product_details {
                lines.push(labels.products.to_string());
                for item in snapshot.items() {
                    lines.push(format!(
                        "  {}  {}€ x{}",
                        item.name,
                        format_amount(item.price),
                        item.quantity
                    ));
                }
            }
            lines
        }
    }
}

/// Redraws the panel on the terminal for every view.
pub struct TerminalPresenter {
    output: Output,
    display: DisplayConfig,
    language: Language,
}

impl TerminalPresenter {
    pub fn new(output: Output, display: DisplayConfig, language: Language) -> Self {
        Self {
            output,
            display,
            language,
        }
    }

    fn render_json(&self, view: PanelView<'_>) {
        let value = match view {
            PanelView::Calculating { snapshot } => serde_json::json!({
                "view": "calculating",
                "cart": snapshot,
            }),
            PanelView::Estimate { snapshot, estimate } => serde_json::json!({
                "view": "estimate",
                "cart": snapshot,
                "estimate": estimate,
                "at": chrono::Utc::now().to_rfc3339(),
            }),
            PanelView::EmptyCart => serde_json::json!({ "view": "emptyCart" }),
        };
        println!("{}", value);
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, view: PanelView<'_>) {
        if self.output.is_json() {
            self.render_json(view);
            return;
        }

        self.output.clear();
        self.output.header(panel_title(self.language));
        for line in panel_lines(view, self.display, self.language) {
            self.output.line(&line);
        }
        if let PanelView::Estimate { estimate, .. } = view {
            self.output.kv(
                "source",
                &format!(
                    "{} ({})",
                    method_badge(estimate.method),
                    chrono::Local::now().format("%H:%M:%S")
                ),
            );
        }
    }
}
