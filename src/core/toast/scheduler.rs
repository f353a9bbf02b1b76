//! Deferred task execution used for toast eviction.
//!
//! The store only needs "run this once after a delay". [`TokioScheduler`]
//! does that on a tokio runtime; [`ManualScheduler`] keeps a virtual clock
//! that callers advance explicitly, which is what the tests use.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task. Cancelling after the task ran has no effect.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Capability to run a task once after `delay`.
pub trait Scheduler: Send + Sync {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// Runs tasks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    shutdown: CancellationToken,
}

impl TokioScheduler {
    /// Binds to the runtime of the calling context.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancels every task scheduled through this instance that has not run yet.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle {
        let token = self.shutdown.child_token();
        let guard = token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {
                    trace!("scheduled task cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    if !guard.is_cancelled() {
                        task();
                    }
                }
            }
        });
        TimerHandle::new(token)
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    token: CancellationToken,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

impl ManualQueue {
    // Cancelled entries would otherwise sit here until their due time.
    fn prune_cancelled(&mut self) {
        self.pending.retain(|entry| !entry.token.is_cancelled());
    }
}

/// Virtual-clock scheduler; nothing runs until [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks that are neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        let mut queue = self.lock();
        queue.prune_cancelled();
        queue.pending.len()
    }

    /// Entries held by the queue, cancelled ones included.
    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves the clock forward and runs every task that became due, in due
    /// order. Tasks scheduled while firing run in the same call when they
    /// fall inside the window. Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut fired = 0;
        while let Some(entry) = self.pop_due(target) {
            if entry.token.is_cancelled() {
                continue;
            }
            // Lock released here so the task may schedule more work.
            (entry.task)();
            fired += 1;
        }
        self.lock().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<PendingTask> {
        let mut queue = self.lock();
        let index = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;
        let entry = queue.pending.swap_remove(index);
        queue.now = queue.now.max(entry.due);
        Some(entry)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualQueue> {
        self.queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerHandle {
        let token = CancellationToken::new();
        let mut queue = self.lock();
        queue.prune_cancelled();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        let due = queue.now + delay;
        queue.pending.push(PendingTask {
            due,
            seq,
            token: token.clone(),
            task,
        });
        TimerHandle::new(token)
    }
}
