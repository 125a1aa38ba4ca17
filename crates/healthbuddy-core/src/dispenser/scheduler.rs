//! Delayed-callback schedulers for the dispenser's timed transitions.
//!
//! [`TokioScheduler`] runs callbacks on a tokio runtime after a real sleep.
//! [`ManualScheduler`] keeps a virtual clock that tests move forward with
//! [`ManualScheduler::advance`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

/// Callback run once its delay has elapsed.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs a callback once after `delay`, without blocking the caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Spawns one tokio task per callback.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling context, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

struct Entry {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_seq: u64,
    queue: Vec<Entry>,
}

/// Virtual-clock scheduler. Nothing runs until [`advance`](Self::advance).
///
/// Clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of callbacks not yet run.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Move the clock forward by `by`, running every callback that falls due,
    /// in due order. Callbacks scheduled while advancing run too if they fall
    /// inside the window. Returns how many callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = 0;
        loop {
            let task = {
                let mut inner = self.lock();
                let next = inner
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= target)
                    .min_by_key(|(_, e)| (e.due, e.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let entry = inner.queue.swap_remove(i);
                        inner.now = entry.due;
                        entry.task
                    }
                    None => {
                        inner.now = target;
                        break;
                    }
                }
            };
            // Run outside the lock so the callback may schedule again.
            task();
            ran += 1;
        }
        ran
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &inner.now)
            .field("pending", &inner.queue.len())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut inner = self.lock();
        let entry = Entry {
            due: inner.now + delay,
            seq: inner.next_seq,
            task,
        };
        inner.next_seq += 1;
        inner.queue.push(entry);
    }
}
