//! Cart extraction command.

use anyhow::{Context as _, Result};
use serde::Serialize;
use seur_commerce::money::format_amount;
use seur_commerce::CartSnapshot;
use seur_extract::{CartExtractor, Html};

use super::ExtractArgs;
use crate::context::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractOutput<'a> {
    page: &'a str,
    is_cart_page: bool,
    cart: Option<&'a CartSnapshot>,
    rejected: Vec<String>,
}

/// Run the extract command.
pub async fn run(args: ExtractArgs, ctx: &Context) -> Result<()> {
    let extractor =
        CartExtractor::new(&ctx.config.selectors).context("Invalid selector configuration")?;
    let html = ctx.page_source(&args.page)?.fetch().await?;
    let report = extractor.extract_report(&Html::parse_document(&html));

    let rejected: Vec<String> = report
        .rejected
        .iter()
        .map(|r| format!("{}: {}", r.container, r.reason))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&ExtractOutput {
            page: &args.page,
            is_cart_page: report.is_cart_page,
            cart: report.snapshot.as_ref(),
            rejected,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Cart on {}", args.page));
    ctx.output.kv("cart page", &report.is_cart_page.to_string());

    for rejection in &rejected {
        ctx.output.debug(&format!("Skipped item {}", rejection));
    }

    let Some(snapshot) = report.snapshot else {
        ctx.output.warn("No cart items found on this page.");
        return Ok(());
    };

    let widths = [28, 10, 5, 16, 12];
    ctx.output.line("");
    ctx.output
        .table_row(&["NAME", "PRICE", "QTY", "SKU", "PRODUCT"], &widths);
    for item in snapshot.items() {
        let price = format_amount(item.price);
        let quantity = item.quantity.to_string();
        ctx.output.table_row(
            &[
                item.name.as_str(),
                price.as_str(),
                quantity.as_str(),
                item.sku.as_str(),
                item.product_id.as_str(),
            ],
            &widths,
        );
    }
    ctx.output.line("");
    ctx.output.kv("items", &snapshot.item_count().to_string());
    ctx.output
        .kv("total", &format!("{}€", format_amount(snapshot.total())));

    Ok(())
}
