//! One-shot shipping estimate.

use anyhow::{bail, Context as _, Result};
use seur_estimate::ShippingEstimator;
use seur_extract::CartExtractor;
use seur_monitor::PanelView;
use tokio::time::Instant;

use super::EstimateArgs;
use crate::context::Context;
use crate::output::method_badge;
use crate::presenter::{panel_lines, panel_title};

/// Run the estimate command.
pub async fn run(args: EstimateArgs, ctx: &Context) -> Result<()> {
    let extractor =
        CartExtractor::new(&ctx.config.selectors).context("Invalid selector configuration")?;

    let mut config = ctx.config.estimator.clone();
    if args.offline {
        config = config.offline();
    }
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold);
    }
    let language = config.language;
    let estimator = ShippingEstimator::new(config).context("Failed to create estimator")?;

    let html = ctx.page_source(&args.page)?.fetch().await?;
    let Some(cart) = extractor.extract_str(&html) else {
        bail!("No cart items found on {}", args.page);
    };
    ctx.output.debug(&format!(
        "Found {} line(s), {} unit(s), total {:.2}",
        cart.items().len(),
        cart.item_count(),
        cart.total()
    ));

    let spinner = ctx.output.spinner("Calculating shipping...");
    let started = Instant::now();
    let estimate = estimator.estimate(&cart).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "cart": cart,
            "estimate": estimate,
            "elapsedMs": started.elapsed().as_millis() as u64,
        }));
        return Ok(());
    }

    ctx.output.header(panel_title(language));
    let view = PanelView::Estimate {
        snapshot: &cart,
        estimate: &estimate,
    };
    for line in panel_lines(view, ctx.config.display, language) {
        ctx.output.line(&line);
    }
    ctx.output.line("");
    ctx.output.kv("source", &method_badge(estimate.method));
    ctx.output.kv(
        "elapsed",
        &format!("{} ms", started.elapsed().as_millis()),
    );
    if estimate.is_fallback() && estimator.has_remote() {
        ctx.output
            .warn("Pricing service unavailable; showing the local estimate.");
    }

    Ok(())
}
