//! Rotation scheduler: fires one announcement per interval.
//!
//! ```text
//! Stopped ──start()──▶ Running ──stop()──▶ Stopped
//!                         │
//!                 tokio interval (fixed rate, first tick immediate)
//!                         └── tick: snapshot → pick → render → dispatch
//! ```
//!
//! The rotation config is read once per `start()`. `restart()` is the only
//! way to apply a new interval or policy. The sequential cursor belongs to
//! the scheduler, not to a run, so a restart continues the rotation where
//! it left off.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use futures::FutureExt;
use herald_core::config::RotationConfig;
use herald_core::error::{HeraldError, Result};
use herald_core::traits::Dispatcher;
use herald_core::types::{DispatchReport, Message};
use herald_markup::render::{RenderOptions, render};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::MessageStore;

/// Default time `stop()` waits for an in-flight tick.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No messages loaded.
    Empty,
    Dispatched { name: String, report: DispatchReport },
    /// Selection or dispatch failed; the scheduler keeps running.
    Failed(String),
}

/// Everything a tick needs. Cloned into the background task.
#[derive(Clone)]
struct Rotation {
    store: Arc<MessageStore>,
    dispatcher: Arc<dyn Dispatcher>,
    render: Arc<ArcSwap<RenderOptions>>,
    cursor: Arc<AtomicU64>,
}

impl Rotation {
    async fn tick(&self, randomized: bool) -> TickOutcome {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            tracing::warn!("No messages available to send");
            return TickOutcome::Empty;
        }

        let picked = if randomized {
            snapshot.random_pick()
        } else {
            let cursor = self.cursor.fetch_add(1, Ordering::Relaxed);
            snapshot.sequential_pick(cursor)
        };
        let Some(message) = picked else {
            tracing::warn!("Failed to get announcement message");
            return TickOutcome::Failed("no message selected".into());
        };

        tracing::info!(
            "Sending announcement '{}' (order: {})",
            message.name,
            if randomized { "random" } else { "sequential" }
        );
        let name = message.name.clone();
        match self.deliver(message).await {
            Ok(report) => {
                if report.is_clean() {
                    tracing::info!("Announcement '{name}' sent: {report}");
                } else {
                    tracing::warn!("Announcement '{name}' partially sent: {report}");
                }
                TickOutcome::Dispatched { name, report }
            }
            Err(e) => {
                tracing::error!("Error sending announcement '{name}': {e}");
                TickOutcome::Failed(e.to_string())
            }
        }
    }

    /// Render and dispatch, turning a dispatcher panic into an error.
    async fn deliver(&self, message: Arc<Message>) -> Result<DispatchReport> {
        let options = self.render.load_full();
        let announcement = render(message, &options);
        AssertUnwindSafe(self.dispatcher.dispatch(&announcement))
            .catch_unwind()
            .await
            .map_err(|panic| {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                HeraldError::dispatch(format!("dispatcher panicked: {reason}"))
            })?
    }

    async fn run(self, config: RotationConfig, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_secs(config.interval_seconds.max(1));
        // First tick completes immediately; later ticks stay on the grid
        // anchored at start. An overrun gets one catch-up tick, never a burst.
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => {}
            }
            self.tick(config.randomized).await;
        }
        tracing::debug!("Rotation loop exited");
    }
}

struct RunningTask {
    config: RotationConfig,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the rotation timer and its start/stop state.
///
/// Construct once and share it behind an `Arc`; all methods take `&self`.
pub struct RotationScheduler {
    rotation: Rotation,
    running: AtomicBool,
    task: Mutex<Option<RunningTask>>,
    stop_grace: Duration,
}

impl RotationScheduler {
    pub fn new(store: Arc<MessageStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            rotation: Rotation {
                store,
                dispatcher,
                render: Arc::new(ArcSwap::from_pointee(RenderOptions::default())),
                cursor: Arc::new(AtomicU64::new(0)),
            },
            running: AtomicBool::new(false),
            task: Mutex::new(None),
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn with_render_options(self, options: RenderOptions) -> Self {
        self.set_render_options(options);
        self
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    /// Display settings used from the next tick on.
    pub fn set_render_options(&self, options: RenderOptions) {
        self.rotation.render.store(Arc::new(options));
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.rotation.store
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Sequential cursor (number of sequential picks made so far).
    pub fn cursor(&self) -> u64 {
        self.rotation.cursor.load(Ordering::Relaxed)
    }

    /// Config of the current run, if running.
    pub async fn active_config(&self) -> Option<RotationConfig> {
        self.task.lock().await.as_ref().map(|t| t.config)
    }

    /// Start rotating. Returns `false` (and does nothing) when already running.
    pub async fn start(&self, config: RotationConfig) -> bool {
        let mut task = self.task.lock().await;
        if task.is_some() {
            tracing::warn!("Announcement scheduler is already running");
            return false;
        }
        if config.interval_seconds == 0 {
            tracing::warn!("Interval of 0 seconds is invalid, using 1 second");
        }
        if self.rotation.store.is_empty() {
            tracing::warn!("No messages loaded, scheduler will start but won't send anything");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.rotation.clone().run(config, shutdown_rx));
        *task = Some(RunningTask { config, shutdown: shutdown_tx, handle });
        self.running.store(true, Ordering::SeqCst);

        tracing::info!(
            "Announcement scheduler started with interval of {} seconds ({})",
            config.interval_seconds.max(1),
            config.policy_name()
        );
        true
    }

    /// Stop rotating. A tick in flight may finish within the grace period,
    /// after which it is aborted. No tick fires once this returns.
    /// Returns `false` when already stopped.
    pub async fn stop(&self) -> bool {
        let mut task = self.task.lock().await;
        let Some(RunningTask { shutdown, mut handle, .. }) = task.take() else {
            tracing::warn!("Announcement scheduler is not running");
            return false;
        };

        let _ = shutdown.send(true);
        match tokio::time::timeout(self.stop_grace, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Rotation task ended abnormally: {e}"),
            Err(_) => {
                tracing::warn!(
                    "Announcement still sending after {:?}, aborting it",
                    self.stop_grace
                );
                handle.abort();
                let _ = handle.await;
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Announcement scheduler stopped");
        true
    }

    /// Stop (if running) and start again with `config`.
    pub async fn restart(&self, config: RotationConfig) -> bool {
        if self.is_running() {
            self.stop().await;
        }
        self.start(config).await
    }

    /// Render and dispatch one specific message right away, outside the
    /// rotation. Does not move the cursor.
    pub async fn announce(&self, message: Arc<Message>) -> Result<DispatchReport> {
        self.rotation.deliver(message).await
    }

    /// Run one rotation step now, as the timer would.
    pub async fn tick_now(&self, randomized: bool) -> TickOutcome {
        self.rotation.tick(randomized).await
    }
}
