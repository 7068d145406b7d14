//! Poller that keeps the todo snapshot in sync with the remote source.

use crate::snapshot::Snapshot;
use crate::source::TodoSource;
use chrono::Local;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Progress message sent from the poller to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A poll was dispatched
    Started,
    /// A poll succeeded and replaced the list
    Updated { count: usize },
    /// A poll failed; the snapshot was left as it was
    Failed(String),
}

/// State shared between the poller handle, its timer task and poll tasks.
struct Shared {
    source: Arc<dyn TodoSource>,
    snapshot: Mutex<Snapshot>,
    events: Mutex<Option<Sender<PollEvent>>>,
    runtime: Handle,
}

impl Shared {
    fn lock_snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PollEvent) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = events.as_ref() {
            if tx.send(event).is_err() {
                // Receiver dropped, stop publishing
                *events = None;
            }
        }
    }

    /// Dispatch one poll unless one is already in flight.
    fn refresh(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        {
            let mut snapshot = self.lock_snapshot();
            if snapshot.in_flight {
                debug!("refresh skipped: poll already in flight");
                return None;
            }
            snapshot.in_flight = true;
        }
        self.emit(PollEvent::Started);

        // Created before the spawn so an aborted, never-polled task still releases it
        let poll = InFlightPoll {
            shared: Arc::clone(self),
            finished: false,
        };
        Some(self.runtime.spawn(poll.run()))
    }
}

/// One dispatched poll. Clears the in-flight flag when dropped unfinished
/// (task aborted, source panicked, runtime shut down).
struct InFlightPoll {
    shared: Arc<Shared>,
    finished: bool,
}

impl InFlightPoll {
    async fn run(mut self) {
        let result = self.shared.source.fetch().await;

        let event = {
            let mut snapshot = self.shared.lock_snapshot();
            self.finished = true;
            match result {
                Ok(items) => {
                    let count = items.len();
                    snapshot.apply_success(items, Local::now());
                    info!(count, "poll applied");
                    PollEvent::Updated { count }
                }
                Err(e) => {
                    snapshot.apply_failure();
                    warn!(error = %e, "poll failed");
                    PollEvent::Failed(e.to_string())
                }
            }
        };

        self.shared.emit(event);
    }
}

impl Drop for InFlightPoll {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.shared.lock_snapshot().apply_failure();
        warn!("poll abandoned before completion");
        self.shared
            .emit(PollEvent::Failed("poll abandoned before completion".to_string()));
    }
}

/// Shortest accepted timer period; tokio intervals cannot tick every zero ms.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Polls a [`TodoSource`] on a fixed interval, keeping at most one request in flight.
pub struct Poller {
    /// Delay between timer-driven polls
    interval: Duration,
    /// Repeating timer task, present while auto refresh is armed
    timer: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl Poller {
    /// Create a new Poller.
    ///
    /// # Arguments
    /// * `source` - Where todos are fetched from
    /// * `interval` - Timer period (default: 5 seconds), raised to [`MIN_INTERVAL`] if shorter
    /// * `runtime` - Runtime that poll and timer tasks are spawned on
    pub fn new(source: Arc<dyn TodoSource>, interval: Duration, runtime: Handle) -> Self {
        let interval = if interval < MIN_INTERVAL {
            warn!(requested = ?interval, "poll interval too short, using {:?}", MIN_INTERVAL);
            MIN_INTERVAL
        } else {
            interval
        };

        Self {
            interval,
            timer: None,
            shared: Arc::new(Shared {
                source,
                snapshot: Mutex::new(Snapshot::default()),
                events: Mutex::new(None),
                runtime,
            }),
        }
    }

    /// Receive [`PollEvent`]s from now on. Replaces any earlier subscriber.
    pub fn subscribe(&self) -> Receiver<PollEvent> {
        let (tx, rx) = mpsc::channel();
        *self
            .shared
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    /// Trigger one poll.
    ///
    /// Returns `None` without touching the network if a previous poll has
    /// not resolved yet, otherwise the handle of the dispatched poll task.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.shared.refresh()
    }

    /// Poll immediately, then on every tick of the interval timer.
    pub fn start(&mut self) {
        self.stop();
        self.shared.refresh();
        self.arm_timer();
    }

    /// Disarm the timer. A poll that is already in flight still completes.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("poll timer stopped");
        }
    }

    /// Arm or disarm the timer without an immediate poll.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        if enabled {
            if self.timer.is_none() {
                self.arm_timer();
            }
        } else {
            self.stop();
        }
    }

    pub fn is_auto_refresh(&self) -> bool {
        self.timer.is_some()
    }

    /// Current copy of the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock_snapshot().clone()
    }

    fn arm_timer(&mut self) {
        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        let first_tick = Instant::now() + period;

        let handle = self.shared.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                shared.refresh();
            }
        });

        debug!(interval = ?period, "poll timer armed");
        self.timer = Some(handle);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
