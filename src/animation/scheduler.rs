//! Cooperative task scheduler scoped to one chart's lifetime.
//!
//! Tasks are plain closures polled with the current frame time. The host calls
//! [`AnimationScope::run_pending`] once per frame (GPUI: from the paint callback, followed by
//! `request_animation_frame` while work remains). Nothing here blocks the drawing thread:
//! spawning only enqueues.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
}

type Job = Box<dyn FnMut(Instant) -> TaskStatus + Send>;

#[derive(Clone, Debug, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }

    fn same_task(&self, other: &TaskHandle) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

struct ScheduledTask {
    handle: TaskHandle,
    job: Job,
}

#[derive(Default)]
struct ScopeInner {
    tasks: Vec<ScheduledTask>,
    closed: bool,
}

#[derive(Clone, Default)]
pub struct AnimationScope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl AnimationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `job`; it is first polled on the next [`run_pending`](Self::run_pending).
    /// A closed scope hands back an already cancelled handle.
    pub fn spawn(
        &self,
        job: impl FnMut(Instant) -> TaskStatus + Send + 'static,
    ) -> TaskHandle {
        let handle = TaskHandle::default();
        let mut inner = self.inner.lock();
        if inner.closed {
            debug!("spawn on a closed animation scope ignored");
            handle.cancel();
            return handle;
        }
        inner.tasks.push(ScheduledTask {
            handle: handle.clone(),
            job: Box::new(job),
        });
        handle
    }

    /// Polls every live task once, in spawn order. Returns the number of tasks still pending.
    pub fn run_pending(&self, now: Instant) -> usize {
        let mut tasks = std::mem::take(&mut self.inner.lock().tasks);
        let polled = tasks.len();

        tasks.retain_mut(|task| {
            if task.handle.is_cancelled() {
                return false;
            }
            match (task.job)(now) {
                TaskStatus::Pending => true,
                TaskStatus::Done => {
                    task.handle.finished.store(true, Ordering::Release);
                    false
                }
            }
        });

        let mut inner = self.inner.lock();
        if inner.closed {
            tasks.iter().for_each(|t| t.handle.cancel());
            return 0;
        }
        // Tasks spawned while polling run after the ones that were already queued.
        tasks.append(&mut inner.tasks);
        inner.tasks = tasks;
        trace!(polled, remaining = inner.tasks.len(), "animation tasks polled");
        inner.tasks.len()
    }

    pub fn pending(&self) -> usize {
        self.inner
            .lock()
            .tasks
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    pub fn is_queued(&self, handle: &TaskHandle) -> bool {
        self.inner
            .lock()
            .tasks
            .iter()
            .any(|t| t.handle.same_task(handle) && !t.handle.is_cancelled())
    }

    /// Cancels everything and refuses further work. Called when the chart is torn down.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        let cancelled = inner.tasks.len();
        inner.tasks.drain(..).for_each(|t| t.handle.cancel());
        inner.closed = true;
        debug!(cancelled, "animation scope closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}
