//! Continuous cart watching.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use seur_estimate::{HealthState, HealthStatus, ShippingEstimator};
use seur_extract::CartExtractor;
use seur_monitor::{is_url, spawn_file_watcher, Monitor, MonitorHandle, DEFAULT_WATCH_POLL};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::WatchArgs;
use crate::context::Context;
use crate::output::Output;
use crate::presenter::TerminalPresenter;

/// How often the pricing service health is reported while watching.
const HEALTH_REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Run the watch command until Ctrl-C or `q`.
pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let extractor =
        CartExtractor::new(&ctx.config.selectors).context("Invalid selector configuration")?;

    let mut estimator_config = ctx.config.estimator.clone();
    if args.offline {
        estimator_config = estimator_config.offline();
    }
    let language = estimator_config.language;
    let estimator =
        ShippingEstimator::new(estimator_config).context("Failed to create estimator")?;

    let mut monitor_config = ctx.config.monitor.clone();
    if let Some(interval) = args.interval {
        monitor_config.update_interval_ms = interval;
    }

    let source = ctx.page_source(&args.page)?;
    let presenter = TerminalPresenter::new(ctx.output.clone(), ctx.config.display, language);
    let (monitor, handle) = Monitor::new(
        monitor_config,
        extractor,
        source,
        Arc::new(estimator),
        presenter,
    );

    ctx.output.info(&format!(
        "Watching {} (r + Enter to recalculate, q + Enter or Ctrl-C to stop)",
        args.page
    ));

    let watcher = (!is_url(&args.page)).then(|| {
        spawn_file_watcher(ctx.resolve_path(&args.page), handle.clone(), DEFAULT_WATCH_POLL)
    });

    let (status, ()) = tokio::join!(monitor.run(), control(handle, ctx.output.clone()));
    if let Some(watcher) = watcher {
        watcher.abort();
    }

    ctx.output.line("");
    ctx.output.kv("passes", &status.metrics.passes.to_string());
    ctx.output.kv("changes", &status.metrics.changes.to_string());
    ctx.output.kv("estimates", &status.metrics.estimates().to_string());
    if status.metrics.stale_discarded > 0 {
        ctx.output
            .kv("discarded", &status.metrics.stale_discarded.to_string());
    }
    if let Some(at) = status.last_calculated_at {
        ctx.output.kv("last estimate", &at.to_rfc3339());
    }
    if let Some(pricing) = &status.pricing {
        ctx.output.kv("pricing service", &pricing_summary(pricing));
    }

    Ok(())
}

/// One-line description of the pricing service health.
fn pricing_summary(status: &HealthStatus) -> String {
    let mut summary = format!("{} ({})", status.state.as_str(), status.endpoint);
    if let Some(at) = status.last_check {
        summary.push_str(&format!(", checked {}", at.format("%H:%M:%S")));
    }
    if let Some(error) = &status.last_error {
        summary.push_str(&format!(": {}", error));
    }
    summary
}

/// Forward keyboard commands to the monitor until asked to stop, reporting
/// pricing service health whenever it changes.
async fn control(handle: MonitorHandle, output: Output) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut health_report = tokio::time::interval(HEALTH_REPORT_INTERVAL);
    let mut reported: Option<HealthState> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = health_report.tick() => {
                let Some(pricing) = handle.status().pricing else { continue };
                if reported != Some(pricing.state) {
                    reported = Some(pricing.state);
                    let message = format!("Pricing service {}", pricing_summary(&pricing));
                    match pricing.state {
                        HealthState::Unhealthy => output.warn(&message),
                        _ => output.debug(&message),
                    }
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match line.trim() {
                    "r" => {
                        if handle.recalculate().await.is_err() {
                            break;
                        }
                    }
                    "q" => break,
                    _ => {}
                },
                Ok(None) | Err(_) => stdin_open = false,
            },
        }
    }

    handle.shutdown().await;
}
