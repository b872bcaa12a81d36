//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use dialoguer::Confirm;
use seur_extract::CartExtractor;

use super::{ConfigArgs, ConfigCommand, ConfigFormat};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force, format } => init_config(force, format, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_file {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let estimator = &ctx.config.estimator;
    ctx.output.line("");
    ctx.output.line("[estimator]");
    ctx.output.kv(
        "endpoint",
        estimator.endpoint.as_deref().unwrap_or("(none, local estimates only)"),
    );
    ctx.output.kv(
        "free_shipping_threshold",
        &estimator.free_shipping_threshold.to_string(),
    );
    ctx.output.kv("timeout_ms", &estimator.timeout_ms.to_string());
    ctx.output.kv(
        "health_check_interval_ms",
        &estimator.health_check_interval_ms.to_string(),
    );
    ctx.output.kv("language", &format!("{:?}", estimator.language).to_lowercase());
    ctx.output.kv("address", &estimator.address.one_line());
    ctx.output.kv(
        "rates",
        &format!(
            "base {} + {} per kg, {} kg per unit",
            estimator.rates.base_cost, estimator.rates.per_kg_cost, estimator.rates.unit_weight
        ),
    );

    let selectors = &ctx.config.selectors;
    ctx.output.line("");
    ctx.output.line("[selectors]");
    ctx.output.kv("containers", &selectors.containers.join(", "));
    ctx.output.kv("name", &selectors.name.join(", "));
    ctx.output.kv("price", &selectors.price.join(", "));
    ctx.output.kv("quantity", &selectors.quantity.join(", "));
    ctx.output.kv("sku", &selectors.sku.join(", "));
    ctx.output.kv("cart_page", &selectors.cart_page.join(", "));
    ctx.output
        .kv("product_id_attribute", &selectors.product_id_attribute);

    let monitor = &ctx.config.monitor;
    ctx.output.line("");
    ctx.output.line("[monitor]");
    ctx.output
        .kv("update_interval_ms", &monitor.update_interval_ms.to_string());
    ctx.output.kv("debounce_ms", &monitor.debounce_ms.to_string());
    ctx.output
        .kv("comparison", &format!("{:?}", monitor.comparison).to_lowercase());

    ctx.output.line("");
    ctx.output.line("[display]");
    ctx.output.kv(
        "show_product_details",
        &ctx.config.display.show_product_details.to_string(),
    );
    ctx.output.kv(
        "show_shipping_details",
        &ctx.config.display.show_shipping_details.to_string(),
    );

    ctx.output.line("");
    ctx.output.line("[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_directive());
    ctx.output
        .kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    Ok(())
}

async fn init_config(force: bool, format: ConfigFormat, ctx: &Context) -> Result<()> {
    let file_name = match format {
        ConfigFormat::Toml => "seur.toml",
        ConfigFormat::Json => "seur.json",
    };
    let config_path = ctx.cwd.join(file_name);

    if config_path.exists() && !force {
        let overwrite = !ctx.output.is_json()
            && console::user_attended()
            && Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite?", config_path.display()))
                .default(false)
                .interact()?;
        if !overwrite {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
    }

    match format {
        ConfigFormat::Toml => fs::write(&config_path, generate_default_config())?,
        ConfigFormat::Json => CliConfig::default().save(&config_path.to_string_lossy())?,
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect configuration errors and warnings.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let estimator = &config.estimator;
    match estimator.endpoint.as_deref().map(str::trim) {
        None | Some("") => warnings.push(
            "estimator.endpoint is not set; estimates will use the local rule".to_string(),
        ),
        Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
            errors.push(format!("estimator.endpoint '{}' is not an http(s) URL", url));
        }
        Some(url) if url.starts_with("http://") => {
            warnings.push(format!("estimator.endpoint '{}' is not using https", url));
        }
        Some(_) => {}
    }

    if !estimator.free_shipping_threshold.is_finite() || estimator.free_shipping_threshold < 0.0 {
        errors.push("estimator.free_shipping_threshold must be a non-negative number".to_string());
    }

    if estimator.timeout_ms == 0 {
        errors.push("estimator.timeout_ms must be greater than 0".to_string());
    }

    let rates = &estimator.rates;
    for (name, value) in [
        ("base_cost", rates.base_cost),
        ("per_kg_cost", rates.per_kg_cost),
        ("unit_weight", rates.unit_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("estimator.rates.{} must be a non-negative number", name));
        }
    }

    if estimator.address.country_code.len() != 2 {
        warnings.push(format!(
            "estimator.address.countryCode '{}' should be a two-letter code",
            estimator.address.country_code
        ));
    }

    if let Err(e) = CartExtractor::new(&config.selectors) {
        errors.push(format!("selectors: {}", e));
    }

    let monitor = &config.monitor;
    if monitor.update_interval_ms == 0 {
        errors.push("monitor.update_interval_ms must be greater than 0".to_string());
    } else if monitor.debounce_ms >= monitor.update_interval_ms {
        warnings.push(format!(
            "monitor.debounce_ms ({}) is not shorter than update_interval_ms ({})",
            monitor.debounce_ms, monitor.update_interval_ms
        ));
    }

    (errors, warnings)
}
