//! The monitoring loop.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use seur_commerce::{CartSnapshot, ChangeDetector, ShippingEstimate};
use seur_estimate::{HealthStatus, ShippingQuoter};
use seur_extract::{CartExtractor, Html};
use seur_observability::MonitorMetrics;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::presenter::{PanelView, Presenter};
use crate::source::PageSource;
use crate::trigger::Trigger;

/// Observable state of a running monitor.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Last accepted snapshot.
    pub last_snapshot: Option<CartSnapshot>,
    /// Last estimate shown for the current snapshot.
    pub last_estimate: Option<ShippingEstimate>,
    /// When `last_estimate` was produced.
    pub last_calculated_at: Option<DateTime<Utc>>,
    /// Whether an estimate is in flight.
    pub is_calculating: bool,
    /// Whether the last page read looked like a cart page.
    pub is_cart_page: bool,
    /// Health of the remote pricing service, when the quoter has one.
    pub pricing: Option<HealthStatus>,
    pub metrics: MonitorMetrics,
}

enum Command {
    Trigger(Trigger),
    Shutdown,
}

struct EstimateDone {
    generation: u64,
    snapshot: CartSnapshot,
    estimate: ShippingEstimate,
    elapsed: Duration,
}

/// Control handle for a [`Monitor`]. Cheap to clone.
///
/// The loop stops when [`MonitorHandle::shutdown`] is called or every handle
/// has been dropped.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    tx: mpsc::Sender<Command>,
    status: watch::Receiver<MonitorStatus>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trigger(t) => f.debug_tuple("Trigger").field(t).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl MonitorHandle {
    /// Send a trigger, waiting for channel capacity.
    pub async fn notify(&self, trigger: Trigger) -> Result<(), MonitorError> {
        self.tx
            .send(Command::Trigger(trigger))
            .await
            .map_err(|_| MonitorError::Closed)
    }

    /// Send a trigger without waiting. Dropped silently when the channel is full.
    pub fn try_notify(&self, trigger: Trigger) -> Result<(), MonitorError> {
        match self.tx.try_send(Command::Trigger(trigger)) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(MonitorError::Closed),
        }
    }

    /// Force a re-estimate of the current snapshot.
    pub async fn recalculate(&self) -> Result<(), MonitorError> {
        self.notify(Trigger::Recalculate).await
    }

    /// Whether the loop has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Stop the loop. Idempotent.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown).await;
    }

    /// Current status.
    pub fn status(&self) -> MonitorStatus {
        self.status.borrow().clone()
    }

    /// Watch channel receiving every status update.
    pub fn subscribe(&self) -> watch::Receiver<MonitorStatus> {
        self.status.clone()
    }
}

/// Watches a page for cart changes and keeps a shipping estimate current.
pub struct Monitor<P> {
    config: MonitorConfig,
    extractor: CartExtractor,
    source: Box<dyn PageSource>,
    quoter: Arc<dyn ShippingQuoter>,
    presenter: P,
    detector: ChangeDetector,
    commands: mpsc::Receiver<Command>,
    ticker: mpsc::WeakSender<Command>,
    status_tx: watch::Sender<MonitorStatus>,
    state: LoopState,
}

#[derive(Default)]
struct LoopState {
    last_snapshot: Option<CartSnapshot>,
    last_estimate: Option<ShippingEstimate>,
    last_calculated_at: Option<DateTime<Utc>>,
    is_cart_page: bool,
    /// Bumped whenever a new snapshot is accepted.
    generation: u64,
    /// The current snapshot still needs an estimate.
    pending: bool,
    in_flight: Option<JoinHandle<()>>,
    metrics: MonitorMetrics,
}

impl<P: Presenter> Monitor<P> {
    /// Create a monitor and its control handle. Nothing runs until [`Monitor::run`].
    pub fn new(
        config: MonitorConfig,
        extractor: CartExtractor,
        source: Box<dyn PageSource>,
        quoter: Arc<dyn ShippingQuoter>,
        presenter: P,
    ) -> (Self, MonitorHandle) {
        let (tx, commands) = mpsc::channel(config.channel_capacity.max(1));
        let (status_tx, status) = watch::channel(MonitorStatus::default());
        let monitor = Self {
            detector: ChangeDetector::new(config.comparison),
            config,
            extractor,
            source,
            quoter,
            presenter,
            commands,
            ticker: tx.downgrade(),
            status_tx,
            state: LoopState::default(),
        };
        (monitor, MonitorHandle { tx, status })
    }

    /// Run until shutdown. Returns the final status.
    ///
    /// A first pass runs immediately, then one per polling interval.
    pub async fn run(mut self) -> MonitorStatus {
        info!(
            source = %self.source.describe(),
            interval_ms = self.config.update_interval_ms,
            debounce_ms = self.config.debounce_ms,
            "Monitor started"
        );

        let ticker = spawn_ticker(self.ticker.clone(), self.config.update_interval());
        let (done_tx, mut done_rx) = mpsc::channel::<EstimateDone>(4);
        let mut debounce: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Trigger(trigger)) => {
                        self.handle_trigger(trigger, &mut debounce).await;
                    }
                    Some(Command::Shutdown) | None => break,
                },
                _ = async {
                    if let Some(sleep) = debounce.as_mut() {
                        sleep.await
                    } else {
                        std::future::pending::<()>().await
                    }
                }, if debounce.is_some() => {
                    debounce = None;
                    self.run_pass().await;
                }
                Some(done) = done_rx.recv() => self.finish_estimate(done),
            }
            self.start_pending_estimate(&done_tx);
        }

        ticker.abort();
        if let Some(task) = self.state.in_flight.take() {
            task.abort();
        }
        info!(
            passes = self.state.metrics.passes,
            estimates = self.state.metrics.estimates(),
            "Monitor stopped"
        );
        self.publish();
        self.status_tx.borrow().clone()
    }

    async fn handle_trigger(&mut self, trigger: Trigger, debounce: &mut Option<Pin<Box<Sleep>>>) {
        debug!(?trigger, "Trigger received");
        match trigger {
            Trigger::Tick => self.run_pass().await,
            Trigger::Mutation | Trigger::CommerceEvent(_) => {
                let deadline = Instant::now() + self.config.debounce();
                if let Some(sleep) = debounce.as_mut() {
                    sleep.as_mut().reset(deadline);
                } else {
                    *debounce = Some(Box::pin(tokio::time::sleep_until(deadline)));
                }
            }
            Trigger::CartPushed(snapshot) => self.observe(snapshot),
            Trigger::Recalculate => match &self.state.last_snapshot {
                Some(snapshot) if !snapshot.is_empty() => self.state.pending = true,
                _ => debug!("Nothing to recalculate"),
            },
        }
    }

    /// Read the page, extract the cart and feed it to change detection.
    async fn run_pass(&mut self) {
        let html = match self.source.fetch().await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Failed to read page");
                return;
            }
        };

        let report = {
            let document = Html::parse_document(&html);
            self.extractor.extract_report(&document)
        };
        self.state.is_cart_page = report.is_cart_page;
        self.state.metrics.record_pass(report.snapshot.is_some());

        match report.snapshot {
            Some(snapshot) => self.observe(snapshot),
            None => debug!(rejected = report.rejected.len(), "No cart found on page"),
        }
        self.publish();
    }

    /// Accept `snapshot` if it differs from the last one.
    fn observe(&mut self, snapshot: CartSnapshot) {
        if !self
            .detector
            .has_changed(self.state.last_snapshot.as_ref(), &snapshot)
        {
            return;
        }

        self.state.metrics.record_change();
        self.state.generation += 1;
        info!(
            items = snapshot.items().len(),
            total = snapshot.total(),
            generation = self.state.generation,
            "Cart changed"
        );

        if snapshot.is_empty() {
            self.state.pending = false;
            self.state.last_estimate = None;
            self.presenter.render(PanelView::EmptyCart);
        } else {
            self.state.pending = true;
        }
        self.state.last_snapshot = Some(snapshot);
        self.publish();
    }

    /// Start an estimate for the current snapshot unless one is already running.
    fn start_pending_estimate(&mut self, done_tx: &mpsc::Sender<EstimateDone>) {
        if !self.state.pending || self.state.in_flight.is_some() {
            return;
        }
        let Some(snapshot) = self.state.last_snapshot.clone() else {
            self.state.pending = false;
            return;
        };
        self.state.pending = false;

        self.presenter
            .render(PanelView::Calculating { snapshot: &snapshot });

        let generation = self.state.generation;
        let quoter = Arc::clone(&self.quoter);
        let done_tx = done_tx.clone();
        self.state.in_flight = Some(tokio::spawn(async move {
            let started = Instant::now();
            let estimate = quoter.estimate(&snapshot).await;
            let _ = done_tx
                .send(EstimateDone {
                    generation,
                    snapshot,
                    estimate,
                    elapsed: started.elapsed(),
                })
                .await;
        }));
        self.publish();
    }

    fn finish_estimate(&mut self, done: EstimateDone) {
        self.state.in_flight = None;

        if done.generation != self.state.generation {
            debug!(
                result_generation = done.generation,
                current_generation = self.state.generation,
                "Discarding stale estimate"
            );
            self.state.metrics.record_stale();
            self.publish();
            return;
        }

        self.state
            .metrics
            .record_estimate(done.estimate.method, done.elapsed);
        info!(
            cost = done.estimate.cost,
            method = %done.estimate.method,
            elapsed_ms = done.elapsed.as_millis() as u64,
            "Shipping estimated"
        );
        self.presenter.render(PanelView::Estimate {
            snapshot: &done.snapshot,
            estimate: &done.estimate,
        });
        self.state.last_estimate = Some(done.estimate);
        self.state.last_calculated_at = Some(Utc::now());
        self.publish();
    }

    fn publish(&self) {
        let state = &self.state;
        self.status_tx.send_replace(MonitorStatus {
            last_snapshot: state.last_snapshot.clone(),
            last_estimate: state.last_estimate.clone(),
            last_calculated_at: state.last_calculated_at,
            is_calculating: state.in_flight.is_some(),
            is_cart_page: state.is_cart_page,
            pricing: self.quoter.health(),
            metrics: state.metrics.clone(),
        });
    }
}

/// Feed a `Tick` into the channel every `period`, starting immediately.
///
/// Holds only a weak sender so the loop still stops when every handle is gone.
fn spawn_ticker(weak: mpsc::WeakSender<Command>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(tx) = weak.upgrade() else { break };
            if tx.send(Command::Trigger(Trigger::Tick)).await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use seur_commerce::{CartItem, EstimateMethod};
    use seur_extract::SelectorConfig;

    use super::*;
    use crate::source::MemoryPageSource;
    use crate::trigger::CommerceEventKind;

    fn cart_html(items: &[(&str, &str, u32)]) -> String {
        let mut html = String::from("<html><body><div class=\"cart-summary\">");
        for (name, price, qty) in items {
            html.push_str(&format!(
                "<div class=\"cart-item\"><span class=\"item-title\">{name}</span>\
                 <span class=\"item-price\">{price}</span>\
                 <span class=\"item-quantity\">{qty}</span></div>"
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    /// Quoter that records the totals it was asked about.
    struct FakeQuoter {
        delay: Duration,
        totals: Mutex<Vec<f64>>,
    }

    impl FakeQuoter {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                totals: Mutex::new(Vec::new()),
            })
        }

        fn totals(&self) -> Vec<f64> {
            self.totals.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ShippingQuoter for FakeQuoter {
        async fn estimate(&self, cart: &CartSnapshot) -> ShippingEstimate {
            self.totals.lock().unwrap().push(cart.total());
            tokio::time::sleep(self.delay).await;
            ShippingEstimate {
                cost: 4.95,
                is_free_shipping: false,
                message: "test".to_string(),
                total_weight: cart.item_count() as f64,
                parcel_count: 1,
                method: EstimateMethod::Remote,
                calculation_method: "test".to_string(),
                remaining_for_free: 0.0,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Rendered {
        Calculating(f64),
        Estimate(f64),
        EmptyCart,
    }

    #[derive(Clone, Default)]
    struct RecordingPresenter(Arc<Mutex<Vec<Rendered>>>);

    impl RecordingPresenter {
        fn views(&self) -> Vec<Rendered> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, view: PanelView<'_>) {
            let rendered = match view {
                PanelView::Calculating { snapshot } => Rendered::Calculating(snapshot.total()),
                PanelView::Estimate { snapshot, .. } => Rendered::Estimate(snapshot.total()),
                PanelView::EmptyCart => Rendered::EmptyCart,
            };
            self.0.lock().unwrap().push(rendered);
        }
    }

    struct Fixture {
        monitor: Monitor<RecordingPresenter>,
        handle: MonitorHandle,
        page: Arc<MemoryPageSource>,
        quoter: Arc<FakeQuoter>,
        presenter: RecordingPresenter,
    }

    fn fixture(config: MonitorConfig, html: &str, delay: Duration) -> Fixture {
        let page = Arc::new(MemoryPageSource::new(html));
        let quoter = FakeQuoter::new(delay);
        let presenter = RecordingPresenter::default();
        let extractor = CartExtractor::new(&SelectorConfig::default()).unwrap();
        let (monitor, handle) = Monitor::new(
            config,
            extractor,
            Box::new(Arc::clone(&page)),
            quoter.clone(),
            presenter.clone(),
        );
        Fixture {
            monitor,
            handle,
            page,
            quoter,
            presenter,
        }
    }

    fn snapshot(total_price: f64) -> CartSnapshot {
        CartSnapshot::from_items(vec![CartItem::new("Gorra", total_price, 1, "CAP", "PROD-9")])
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_estimates_once() {
        let f = fixture(
            MonitorConfig::default(),
            &cart_html(&[("Camiseta", "12,50 €", 2)]),
            Duration::ZERO,
        );
        let handle = f.handle.clone();
        let driver = async move {
            // Three polling passes over an unchanged page.
            tokio::time::sleep(Duration::from_millis(4500)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        assert_eq!(f.quoter.totals(), vec![25.0]);
        assert_eq!(
            f.presenter.views(),
            vec![Rendered::Calculating(25.0), Rendered::Estimate(25.0)]
        );
        assert_eq!(status.metrics.passes, 3);
        assert_eq!(status.metrics.changes, 1);
        assert_eq!(status.metrics.remote_estimates, 1);
        assert!(status.last_calculated_at.is_some());
        assert!(!status.is_calculating);
        assert_eq!(status.last_estimate.map(|e| e.cost), Some(4.95));
        assert!(status.pricing.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_triggers_new_estimate() {
        let f = fixture(
            MonitorConfig::default(),
            &cart_html(&[("Camiseta", "10,00 €", 1)]),
            Duration::ZERO,
        );
        let handle = f.handle.clone();
        let page = Arc::clone(&f.page);
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            page.set(cart_html(&[("Camiseta", "10,00 €", 3)]));
            tokio::time::sleep(Duration::from_millis(2000)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        assert_eq!(f.quoter.totals(), vec![10.0, 30.0]);
        assert_eq!(status.metrics.changes, 2);
        assert_eq!(status.last_snapshot.map(|s| s.item_count()), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_without_cart_is_a_miss() {
        let f = fixture(
            MonitorConfig::default(),
            "<html><body><p>Hola</p></body></html>",
            Duration::ZERO,
        );
        let handle = f.handle.clone();
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        assert!(f.quoter.totals().is_empty());
        assert!(f.presenter.views().is_empty());
        assert_eq!(status.metrics.passes, 1);
        assert_eq!(status.metrics.misses, 1);
        assert!(status.last_snapshot.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutations_are_debounced() {
        let config = MonitorConfig {
            update_interval_ms: 60_000,
            ..MonitorConfig::default()
        };
        let f = fixture(config, &cart_html(&[("Taza", "8", 1)]), Duration::ZERO);
        let handle = f.handle.clone();
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            for _ in 0..5 {
                handle.notify(Trigger::Mutation).await.unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            handle
                .notify(Trigger::CommerceEvent(CommerceEventKind::ItemAdded))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(1000)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        // Initial pass plus one for the whole burst.
        assert_eq!(status.metrics.passes, 2);
        assert_eq!(f.quoter.totals(), vec![8.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_estimate_is_discarded() {
        let config = MonitorConfig {
            update_interval_ms: 60_000,
            ..MonitorConfig::default()
        };
        let f = fixture(
            config,
            &cart_html(&[("Camiseta", "10", 1)]),
            Duration::from_millis(3000),
        );
        let handle = f.handle.clone();
        let page = Arc::clone(&f.page);
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            page.set(cart_html(&[("Camiseta", "10", 2)]));
            handle.notify(Trigger::Mutation).await.unwrap();
            tokio::time::sleep(Duration::from_millis(8000)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        // The first estimate was still running when the cart changed.
        assert_eq!(f.quoter.totals(), vec![10.0, 20.0]);
        assert_eq!(status.metrics.stale_discarded, 1);
        assert_eq!(
            f.presenter.views(),
            vec![
                Rendered::Calculating(10.0),
                Rendered::Calculating(20.0),
                Rendered::Estimate(20.0),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recalculate_reestimates_same_cart() {
        let f = fixture(
            MonitorConfig::default(),
            &cart_html(&[("Camiseta", "15", 1)]),
            Duration::ZERO,
        );
        let handle = f.handle.clone();
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            handle.recalculate().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        assert_eq!(f.quoter.totals(), vec![15.0, 15.0]);
        assert_eq!(status.metrics.changes, 1);
        assert_eq!(status.metrics.estimates(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pushed_cart_and_empty_cart() {
        let config = MonitorConfig {
            update_interval_ms: 60_000,
            ..MonitorConfig::default()
        };
        let f = fixture(config, "<html></html>", Duration::ZERO);
        let handle = f.handle.clone();
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.notify(Trigger::CartPushed(snapshot(18.0))).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle
                .notify(Trigger::CartPushed(CartSnapshot::empty()))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            // Recalculating an empty cart does nothing.
            handle.recalculate().await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.shutdown().await;
        };
        let (status, ()) = tokio::join!(f.monitor.run(), driver);

        assert_eq!(f.quoter.totals(), vec![18.0]);
        assert_eq!(
            f.presenter.views(),
            vec![
                Rendered::Calculating(18.0),
                Rendered::Estimate(18.0),
                Rendered::EmptyCart,
            ]
        );
        assert!(status.last_estimate.is_none());
        assert_eq!(status.last_snapshot.map(|s| s.is_empty()), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_is_published() {
        let f = fixture(
            MonitorConfig::default(),
            &cart_html(&[("Camiseta", "12", 1)]),
            Duration::ZERO,
        );
        let handle = f.handle.clone();
        let mut updates = handle.subscribe();
        let driver = async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let status = handle.status();
            assert_eq!(status.last_snapshot.map(|s| s.total()), Some(12.0));
            assert!(updates.has_changed().unwrap());
            assert!(updates.borrow_and_update().is_cart_page);
            handle.shutdown().await;
        };
        let _ = tokio::join!(f.monitor.run(), driver);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_stops_loop() {
        let f = fixture(MonitorConfig::default(), "<html></html>", Duration::ZERO);
        let Fixture {
            monitor, handle, ..
        } = f;
        drop(handle);
        let status = monitor.run().await;
        assert!(status.metrics.passes <= 1);
    }

    #[tokio::test]
    async fn test_notify_after_stop_fails() {
        let f = fixture(MonitorConfig::default(), "<html></html>", Duration::ZERO);
        let Fixture {
            monitor, handle, ..
        } = f;
        handle.shutdown().await;
        monitor.run().await;
        assert_eq!(handle.notify(Trigger::Tick).await, Err(MonitorError::Closed));
        assert_eq!(handle.try_notify(Trigger::Tick), Err(MonitorError::Closed));
    }
}
