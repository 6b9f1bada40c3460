//! Tick sources that drive the countdown.
//!
//! The engine never sleeps or spawns on its own. It arms a [`TickSource`]
//! when it starts running and disarms it when it stops; whoever owns the
//! receiving end calls [`TimerEngine::tick`](super::TimerEngine::tick) for
//! each tick delivered.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A periodic 1 Hz callback subscription the engine can arm and disarm.
pub trait TickSource {
    /// Begin delivering ticks.
    fn arm(&mut self);

    /// Stop delivering ticks.
    fn disarm(&mut self);

    fn is_armed(&self) -> bool;
}

/// Clock-free tick source for tests and embedding.
///
/// Counts every `arm` without deduplicating, so a caller that arms twice
/// shows up as two live subscriptions.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: usize,
    peak: usize,
    arms: usize,
    disarms: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions currently live.
    pub fn active_subscriptions(&self) -> usize {
        self.active
    }

    /// Most subscriptions ever live at once.
    pub fn peak_subscriptions(&self) -> usize {
        self.peak
    }

    pub fn arm_count(&self) -> usize {
        self.arms
    }

    pub fn disarm_count(&self) -> usize {
        self.disarms
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self) {
        self.arms += 1;
        self.active += 1;
        self.peak = self.peak.max(self.active);
    }

    fn disarm(&mut self) {
        self.disarms += 1;
        self.active = self.active.saturating_sub(1);
    }

    fn is_armed(&self) -> bool {
        self.active > 0
    }
}

/// Real-time tick source backed by a tokio interval task.
///
/// Each tick is sent as the generation number of the subscription that
/// produced it. Ticks still queued from an earlier, disarmed subscription
/// fail [`accepts`](Self::accepts) and must be dropped by the receiver.
#[derive(Debug)]
pub struct IntervalTicker {
    runtime: Handle,
    tx: mpsc::UnboundedSender<u64>,
    task: Option<JoinHandle<()>>,
    generation: u64,
    period: Duration,
}

impl IntervalTicker {
    /// One tick per second, spawned on `runtime`.
    pub fn new(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<u64>) {
        Self::with_period(runtime, Duration::from_secs(1))
    }

    pub fn with_period(
        runtime: Handle,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            runtime,
            tx,
            task: None,
            generation: 0,
            period,
        };
        (ticker, rx)
    }

    /// Whether a tick tagged `generation` belongs to the live subscription.
    pub fn accepts(&self, generation: u64) -> bool {
        self.task.is_some() && generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self) {
        if self.task.is_some() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(generation, "tick source armed");
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!(generation = self.generation, "tick source disarmed");
        }
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}
