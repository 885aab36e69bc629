/*!
 * Lifecycle Module
 * Staged startup/shutdown instrumentation over an orchestration engine
 */

pub mod coordinator;
pub mod monitored;
pub mod observer;
pub mod resolver;

// Re-export public API
pub use coordinator::LifecycleCoordinator;
pub use monitored::MonitoredObserver;
pub use observer::{LifecycleObserver, Registration, StageListener, StagedLifecycle};
pub use resolver::{StageResolver, StaticStageResolver};
