//! Repeating timer tasks
//!
//! A [`PeriodicTask`] runs a step function on a fixed period until the step
//! asks to stop or the owner stops it. The first step runs one full period
//! after spawning. Dropping the handle also ends the loop at its next wake-up.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::core::errors::SchedulerError;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a step function running on a tokio interval
#[derive(Debug)]
pub struct PeriodicTask {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
    period: Duration,
}

impl PeriodicTask {
    /// Start running `step` every `period` on the current tokio runtime
    ///
    /// A zero period is raised to one millisecond.
    pub fn spawn<F>(period: Duration, mut step: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        debug!("Periodic task stopped by owner");
                        break;
                    }
                    _ = interval.tick() => {
                        counter.fetch_add(1, Ordering::SeqCst);
                        if step().is_break() {
                            debug!("Periodic task finished after {} ticks", counter.load(Ordering::SeqCst));
                            break;
                        }
                    }
                }
            }
        });

        debug!("Spawned periodic task every {:?}", period);
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            ticks,
            period,
        }
    }

    /// Number of times the step has run so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the loop has ended, either way
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal the loop to end and wait for it
    ///
    /// Returns the final tick count.
    pub async fn stop(&mut self) -> Result<u64, SchedulerError> {
        let handle = self.handle.take().ok_or(SchedulerError::AlreadyStopped)?;
        if let Some(stop_tx) = self.stop_tx.take() {
            // The loop may already have ended on its own
            let _ = stop_tx.send(());
        }
        handle.await?;
        Ok(self.ticks())
    }

    /// Wait for the step to end the loop on its own
    ///
    /// Returns the final tick count.
    pub async fn join(&mut self) -> Result<u64, SchedulerError> {
        let handle = self.handle.take().ok_or(SchedulerError::AlreadyStopped)?;
        handle.await?;
        self.stop_tx = None;
        Ok(self.ticks())
    }
}
