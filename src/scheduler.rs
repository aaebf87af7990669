//! Interval scheduler with an explicit lifecycle.
//!
//! The scheduler runs its job once immediately and then every `period`.
//! State moves `Idle → Running → Idle` per tick and ends in `Stopped`.
//!
//! # Overlap policy
//!
//! A tick that fires while the previous run is still `Running` is skipped
//! (not queued) and counted. Runs never overlap.
//!
//! # Shutdown
//!
//! [`SchedulerHandle::stop`] cancels the timer, aborts an in-flight run
//! without waiting for it, and leaves the state at `Stopped`.

use crate::error::HarvestError;
use crate::pipeline::RunOutcome;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// A repeatable unit of work: one pipeline run per call.
pub type Job =
    Arc<dyn Fn() -> BoxFuture<'static, Result<RunOutcome, HarvestError>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    started: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

/// Tick counters, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub started: u64,
    pub skipped: u64,
    pub failed: u64,
}

struct Inner {
    state: Mutex<SchedulerState>,
    current: Mutex<Option<JoinHandle<()>>>,
    counters: Counters,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState::Idle),
            current: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> SchedulerState {
        *self.lock_state()
    }

    fn set_state(&self, next: SchedulerState) {
        *self.lock_state() = next;
    }

    /// Move to `Running` unless a run is in progress or we are stopped.
    fn try_begin(&self) -> Result<(), SchedulerState> {
        let mut state = self.lock_state();
        match *state {
            SchedulerState::Idle => {
                *state = SchedulerState::Running;
                Ok(())
            }
            other => Err(other),
        }
    }

    /// Back to `Idle`, unless shutdown already moved us to `Stopped`.
    fn finish(&self) {
        let mut state = self.lock_state();
        if *state != SchedulerState::Stopped {
            *state = SchedulerState::Idle;
        }
    }

    fn take_current(&self) -> Option<JoinHandle<()>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn set_current(&self, handle: JoinHandle<()>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}

/// Runs a [`Job`] on a fixed period.
pub struct Scheduler {
    period: Duration,
    job: Job,
}

impl Scheduler {
    pub fn new(period: Duration, job: Job) -> Self {
        Self { period, job }
    }

    /// Spawn the driver task. The first run starts immediately.
    pub fn start(self) -> SchedulerHandle {
        let inner = Arc::new(Inner::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!(period_secs = self.period.as_secs(), "Scheduler started");

        let driver = tokio::spawn(drive(self.period, self.job, Arc::clone(&inner), shutdown_rx));
        SchedulerHandle {
            inner,
            shutdown_tx,
            driver: Some(driver),
        }
    }
}

async fn drive(
    period: Duration,
    job: Job,
    inner: Arc<Inner>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => on_tick(&job, &inner),
        }
    }
}

fn on_tick(job: &Job, inner: &Arc<Inner>) {
    let tick = inner.counters.ticks.fetch_add(1, Ordering::SeqCst) + 1;

    if let Err(state) = inner.try_begin() {
        if state == SchedulerState::Running {
            inner.counters.skipped.fetch_add(1, Ordering::SeqCst);
            warn!(tick, "Previous run still in progress; skipping tick");
        }
        return;
    }

    inner.counters.started.fetch_add(1, Ordering::SeqCst);
    let run = job();
    let task_inner = Arc::clone(inner);
    let handle = tokio::spawn(async move {
        let t0 = Instant::now();
        info!(tick, "Scheduled run starting");
        match run.await {
            Ok(RunOutcome::Written { articles, path }) => info!(
                tick,
                articles,
                path = %path.display(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Scheduled run finished"
            ),
            Ok(RunOutcome::Empty) => info!(
                tick,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Scheduled run finished with no articles"
            ),
            Err(e) => {
                task_inner.counters.failed.fetch_add(1, Ordering::SeqCst);
                error!(tick, error = %e, "Scheduled run failed; retrying next tick");
            }
        }
        task_inner.finish();
    });

    inner.set_current(handle);
}

/// Owner of a running scheduler.
pub struct SchedulerHandle {
    inner: Arc<Inner>,
    shutdown_tx: watch::Sender<bool>,
    driver: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        self.inner.state()
    }

    pub fn stats(&self) -> SchedulerStats {
        let c = &self.inner.counters;
        SchedulerStats {
            ticks: c.ticks.load(Ordering::SeqCst),
            started: c.started.load(Ordering::SeqCst),
            skipped: c.skipped.load(Ordering::SeqCst),
            failed: c.failed.load(Ordering::SeqCst),
        }
    }

    /// Cancel the timer and abort any in-flight run.
    pub async fn stop(mut self) {
        self.inner.set_state(SchedulerState::Stopped);
        let _ = self.shutdown_tx.send(true);

        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
        if let Some(run) = self.inner.take_current() {
            if !run.is_finished() {
                warn!("Aborting in-flight run");
            }
            run.abort();
        }

        let stats = self.stats();
        info!(
            ticks = stats.ticks,
            started = stats.started,
            skipped = stats.skipped,
            failed = stats.failed,
            "Scheduler stopped"
        );
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
        if let Some(run) = self.inner.take_current() {
            run.abort();
        }
    }
}
