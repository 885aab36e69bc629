/*!
 * Runstage Library
 * Staged lifecycle orchestration instrumentation and lifecycle-integrated
 * work queues for host runtimes
 */

pub mod core;
pub mod lifecycle;
pub mod queue;
pub mod telemetry;

// Re-exports
pub use crate::core::errors::{LifecycleError, LifecycleResult, QueueError, QueueResult};
pub use crate::core::types::{Stage, StagePlanEntry};
pub use crate::lifecycle::{
    LifecycleCoordinator, LifecycleObserver, MonitoredObserver, Registration, StageListener,
    StageResolver, StagedLifecycle, StaticStageResolver,
};
pub use crate::queue::{QueueStats, SimpleWorkQueue, WorkHandler, WorkQueue, WorkerStatus};

// Cancellation token used throughout the lifecycle hooks
pub use tokio_util::sync::CancellationToken;
