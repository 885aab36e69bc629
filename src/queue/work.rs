/*!
 * Work Queue
 * Generic single-worker queue that gates, transforms, and publishes items
 *
 * One dedicated thread drains a FIFO of inputs through a user-supplied
 * handler: a readiness predicate gates the head item, a transform produces
 * the output, and a notification callback publishes it. The queue starts and
 * stops itself in response to lifecycle start/stop signals for its stage.
 */

use super::types::{QueueStats, WorkerStatus};
use crate::core::errors::{LifecycleResult, QueueError, QueueResult};
use crate::core::limits::{GATE_RECHECK_INTERVAL, IDLE_WAIT_INTERVAL};
use crate::core::types::Stage;
use crate::lifecycle::{LifecycleCoordinator, LifecycleObserver, Registration};
use log::{debug, error, info};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio_util::sync::CancellationToken;

/// User-supplied gating, transform, and publication hooks for a queue
pub trait WorkHandler<I, O>: Send + Sync {
    /// Whether the head item may be processed now
    ///
    /// A gated head item stays queued and is re-checked after a bounded
    /// wait; nothing overtakes it.
    fn check_conditions(&self, item: &I) -> QueueResult<bool> {
        let _ = item;
        Ok(true)
    }

    /// Transform one input into one output; runs only on the worker thread
    fn process_item(&self, item: I) -> QueueResult<O>;

    /// Called once per produced result, under the ready lock, with the
    /// result and the ready sequence including it
    ///
    /// This is the sole downstream notification channel. It must return
    /// promptly and must not touch the pending side of the queue.
    fn on_item_added(&self, item: &O, ready: &[O]) -> QueueResult<()> {
        let _ = (item, ready);
        Ok(())
    }
}

/// State shared between the queue handle and its worker thread
struct QueueShared<I, O> {
    name: String,
    pending: Mutex<VecDeque<I>>,
    pending_cv: Condvar,
    ready: Mutex<Vec<O>>,
    status: AtomicU8,
    fault: Mutex<Option<QueueError>>,
}

impl<I, O> QueueShared<I, O> {
    fn status(&self) -> WorkerStatus {
        WorkerStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn set_status(&self, status: WorkerStatus) {
        self.status.store(status.as_u8(), Ordering::Release);
    }

    fn record_fault(&self, err: QueueError) {
        *self.fault.lock() = Some(err);
        self.set_status(WorkerStatus::Faulted);
    }
}

/// Worker thread handle and its stop signal
struct WorkerHandle {
    cancel: Option<CancellationToken>,
    thread: Option<JoinHandle<()>>,
}

/// Generic lifecycle-integrated work queue with one dedicated worker thread
///
/// `pending` and `ready` are guarded by separate locks that are never held
/// at the same time, so producers are not stalled while results are read
/// and vice versa.
pub struct WorkQueue<I, O> {
    stage: Stage,
    handler: Arc<dyn WorkHandler<I, O>>,
    shared: Arc<QueueShared<I, O>>,
    worker: Mutex<WorkerHandle>,
}

/// Queue whose output type equals its input type
pub type SimpleWorkQueue<T> = WorkQueue<T, T>;

impl<I, O> WorkQueue<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new(name: impl Into<String>, stage: Stage, handler: Arc<dyn WorkHandler<I, O>>) -> Self {
        Self {
            stage,
            handler,
            shared: Arc::new(QueueShared {
                name: name.into(),
                pending: Mutex::new(VecDeque::new()),
                pending_cv: Condvar::new(),
                ready: Mutex::new(Vec::new()),
                status: AtomicU8::new(WorkerStatus::Created.as_u8()),
                fault: Mutex::new(None),
            }),
            worker: Mutex::new(WorkerHandle {
                cancel: None,
                thread: None,
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Append an item to the pending tail and wake the worker
    ///
    /// Never blocks beyond the lock hold. A faulted queue rejects the item
    /// with the recorded fault.
    pub fn enqueue(&self, item: I) -> QueueResult<()> {
        self.surface_fault()?;
        {
            let mut pending = self.shared.pending.lock();
            pending.push_back(item);
        }
        self.shared.pending_cv.notify_one();
        Ok(())
    }

    /// Signal that gating conditions may have changed
    ///
    /// Wakes a worker parked on a gated head item before its bounded wait
    /// elapses.
    pub fn recheck(&self) {
        self.shared.pending_cv.notify_all();
    }

    /// Current worker status
    pub fn status(&self) -> WorkerStatus {
        self.shared.status()
    }

    /// Fault recorded by the worker loop, if any
    pub fn fault(&self) -> Option<QueueError> {
        self.shared.fault.lock().clone()
    }

    /// Number of items awaiting processing
    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Number of produced results
    pub fn ready_len(&self) -> usize {
        self.shared.ready.lock().len()
    }

    /// Point-in-time statistics; each lock is taken separately
    pub fn stats(&self) -> QueueStats {
        let pending = self.shared.pending.lock().len();
        let ready = self.shared.ready.lock().len();
        QueueStats {
            name: self.shared.name.clone(),
            stage: self.stage,
            status: self.shared.status(),
            pending,
            ready,
        }
    }

    /// Register this queue as a lifecycle participant at its declared stage
    pub fn participate(self: &Arc<Self>, lifecycle: &LifecycleCoordinator) -> Registration {
        lifecycle.register(
            &self.shared.name,
            self.stage,
            Arc::clone(self) as Arc<dyn LifecycleObserver>,
        )
    }

    fn start_worker(&self, cancel: &CancellationToken) -> QueueResult<()> {
        self.surface_fault()?;

        let mut worker = self.worker.lock();
        if worker.thread.is_some() {
            return Err(QueueError::AlreadyRunning(self.shared.name.clone()));
        }

        // Linked signal: cancelling the engine token stops this worker too
        let linked = cancel.child_token();
        let shared = Arc::clone(&self.shared);
        let handler = Arc::clone(&self.handler);
        let token = linked.clone();

        // Status flips before the spawn so a worker that faults immediately
        // is never overwritten back to Running
        self.shared.set_status(WorkerStatus::Running);
        let thread = std::thread::Builder::new()
            .name(format!("workqueue-{}", self.shared.name))
            .spawn(move || run_worker(shared, handler, token))
            .map_err(|e| {
                self.shared.set_status(WorkerStatus::Created);
                QueueError::SpawnFailed {
                    name: self.shared.name.clone(),
                    reason: e.to_string(),
                }
            })?;

        worker.cancel = Some(linked);
        worker.thread = Some(thread);
        info!("Work queue {} started worker thread", self.shared.name);
        Ok(())
    }

    fn stop_worker(&self) -> QueueResult<()> {
        let (cancel, thread) = {
            let mut worker = self.worker.lock();
            (worker.cancel.take(), worker.thread.take())
        };

        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        self.shared.pending_cv.notify_all();

        if let Some(thread) = thread {
            if thread.join().is_err() {
                self.shared
                    .record_fault(QueueError::WorkerPanicked(self.shared.name.clone()));
                error!("Work queue {} worker thread panicked", self.shared.name);
            } else {
                info!("Work queue {} worker thread joined", self.shared.name);
            }
        }

        self.surface_fault()
    }

    fn surface_fault(&self) -> QueueResult<()> {
        if let Some(original) = self.shared.fault.lock().as_ref() {
            return Err(QueueError::Faulted {
                name: self.shared.name.clone(),
                reason: original.to_string(),
            });
        }
        Ok(())
    }
}

impl<I, O> WorkQueue<I, O>
where
    I: Send + 'static,
    O: Clone + Send + 'static,
{
    /// Copy of the produced results so far, in production order
    pub fn ready_snapshot(&self) -> Vec<O> {
        self.shared.ready.lock().clone()
    }
}

impl<I, O> LifecycleObserver for WorkQueue<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn on_start(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        self.start_worker(cancel)?;
        Ok(())
    }

    fn on_stop(&self, _cancel: &CancellationToken) -> LifecycleResult<()> {
        self.stop_worker()?;
        Ok(())
    }
}

impl<I, O> Drop for WorkQueue<I, O> {
    fn drop(&mut self) {
        // Best-effort cancel; the worker holds its own copy of the shared
        // state and exits on the next cancellation check
        let mut worker = self.worker.lock();
        if let Some(cancel) = worker.cancel.take() {
            cancel.cancel();
        }
        self.shared.pending_cv.notify_all();
    }
}

/// Worker loop: drains pending through the handler until cancellation or a
/// terminal fault
fn run_worker<I, O>(
    shared: Arc<QueueShared<I, O>>,
    handler: Arc<dyn WorkHandler<I, O>>,
    cancel: CancellationToken,
) {
    debug!("Work queue {} worker loop entered", shared.name);

    while !cancel.is_cancelled() {
        if let Err(e) = drain_one(&shared, handler.as_ref()) {
            error!("Work queue {} worker faulted: {}", shared.name, e);
            shared.record_fault(e);
            return;
        }
    }

    shared.set_status(WorkerStatus::Stopped);
    debug!("Work queue {} worker loop exited", shared.name);
}

/// Process at most one pending item; parks briefly when idle or gated
fn drain_one<I, O>(shared: &QueueShared<I, O>, handler: &dyn WorkHandler<I, O>) -> QueueResult<()> {
    let item = {
        let mut pending = shared.pending.lock();

        if pending.is_empty() {
            shared.pending_cv.wait_for(&mut pending, IDLE_WAIT_INTERVAL);
            return Ok(());
        }

        let gated = match pending.front() {
            Some(head) => !handler.check_conditions(head)?,
            None => return Ok(()),
        };
        if gated {
            // Head-of-line: the item stays queued and nothing overtakes it.
            // Bounded wait; enqueue, recheck, and stop wake it early.
            shared
                .pending_cv
                .wait_for(&mut pending, GATE_RECHECK_INTERVAL);
            return Ok(());
        }

        pending.pop_front()
    };

    let Some(item) = item else {
        return Ok(());
    };

    // Transform outside both locks so producers never wait on processing
    let output = handler.process_item(item)?;

    let mut ready = shared.ready.lock();
    ready.push(output);
    if let Some(last) = ready.last() {
        handler.on_item_added(last, ready.as_slice())?;
    }
    Ok(())
}
