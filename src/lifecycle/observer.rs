/*!
 * Lifecycle Contracts
 * Traits connecting participants, the staged engine, and completion listeners
 */

use crate::core::errors::LifecycleResult;
use crate::core::types::Stage;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A unit with start/stop hooks registered against a stage
///
/// The lifecycle layer holds a reference for invocation only; ownership stays
/// with whichever component created the observer.
pub trait LifecycleObserver: Send + Sync {
    /// Called when this observer's stage starts
    fn on_start(&self, cancel: &CancellationToken) -> LifecycleResult<()>;

    /// Called when this observer's stage stops
    fn on_stop(&self, cancel: &CancellationToken) -> LifecycleResult<()>;
}

/// Staged orchestration engine contract (consumed, never implemented here)
///
/// The engine invokes `on_start` hooks in ascending stage order and `on_stop`
/// hooks in descending order, grouping same-stage observers together. All of
/// a group's hooks finish (or fail) before the next stage begins, and the
/// engine reports each finished group to its `StageListener`.
pub trait StagedLifecycle: Send + Sync {
    /// Register an observer at a stage
    fn subscribe(
        &self,
        name: &str,
        stage: Stage,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Registration;

    /// Run all start hooks in ascending stage order
    fn start(&self, cancel: &CancellationToken) -> LifecycleResult<()>;

    /// Run all stop hooks in descending stage order
    fn stop(&self, cancel: &CancellationToken) -> LifecycleResult<()>;
}

/// Receives a callback after each stage group finishes a start or stop pass
///
/// Callbacks may arrive concurrently when the engine parallelizes across
/// stage groups; implementations must tolerate out-of-order delivery.
pub trait StageListener: Send + Sync {
    /// All observers at `stage` finished their start pass
    fn on_stage_start_completed(&self, stage: Stage, elapsed: Duration);

    /// All observers at `stage` finished their stop pass
    fn on_stage_stop_completed(&self, stage: Stage, elapsed: Duration);
}

/// Disposable handle for one subscription
///
/// Dropping the handle leaves the subscription in place; registrations
/// normally live for the whole process. Revocation is the explicit act of
/// calling `dispose`.
pub struct Registration {
    revoke: Option<Box<dyn FnOnce() + Send>>,
}

impl Registration {
    /// Handle that revokes the subscription via the given closure
    pub fn new(revoke: impl FnOnce() + Send + 'static) -> Self {
        Self {
            revoke: Some(Box::new(revoke)),
        }
    }

    /// Handle for a subscription that cannot be revoked
    pub fn permanent() -> Self {
        Self { revoke: None }
    }

    /// Whether calling `dispose` would revoke anything
    #[inline]
    pub fn is_revocable(&self) -> bool {
        self.revoke.is_some()
    }

    /// Revoke the subscription
    pub fn dispose(mut self) {
        if let Some(revoke) = self.revoke.take() {
            revoke();
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("revocable", &self.revoke.is_some())
            .finish()
    }
}
