/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::Stage;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LifecycleError {
    #[error("Lifecycle hook failed for {name}: {reason}")]
    #[diagnostic(
        code(lifecycle::hook_failed),
        help("A participant's start or stop hook returned an error. Check the participant's own logs.")
    )]
    HookFailed { name: String, reason: String },

    #[error("Lifecycle pass canceled at stage {0}")]
    #[diagnostic(
        code(lifecycle::canceled),
        help("The cancellation token was triggered before the traversal finished.")
    )]
    Canceled(Stage),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Queue(#[from] QueueError),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Work-queue-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Worker already running for queue {0}")]
    #[diagnostic(
        code(queue::already_running),
        help("A queue owns exactly one worker thread. Stop it before starting again.")
    )]
    AlreadyRunning(String),

    #[error("Failed to spawn worker thread for queue {name}: {reason}")]
    #[diagnostic(
        code(queue::spawn_failed),
        help("The OS refused to create a thread. Check process thread limits.")
    )]
    SpawnFailed { name: String, reason: String },

    #[error("Queue {name} is faulted: {reason}")]
    #[diagnostic(
        code(queue::faulted),
        help("The worker loop exited on an unhandled error. The queue no longer drains items.")
    )]
    Faulted { name: String, reason: String },

    #[error("Condition check failed: {0}")]
    #[diagnostic(
        code(queue::condition_check),
        help("The readiness predicate itself errored. The head item was left in place.")
    )]
    ConditionCheck(String),

    #[error("Item processing failed: {0}")]
    #[diagnostic(
        code(queue::processing),
        help("The transform returned an error. Retry policy belongs to the transform itself.")
    )]
    Processing(String),

    #[error("Result notification failed: {0}")]
    #[diagnostic(
        code(queue::notification),
        help("The on_item_added callback returned an error after the result was appended.")
    )]
    Notification(String),

    #[error("Worker thread panicked for queue {0}")]
    #[diagnostic(
        code(queue::worker_panicked),
        help("A handler panicked instead of returning an error. The queue is faulted.")
    )]
    WorkerPanicked(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_into_lifecycle_error() {
        let err: LifecycleError = QueueError::AlreadyRunning("ingest".to_string()).into();
        assert_eq!(
            err,
            LifecycleError::Queue(QueueError::AlreadyRunning("ingest".to_string()))
        );
    }

    #[test]
    fn test_error_display_carries_context() {
        let err = QueueError::Faulted {
            name: "ingest".to_string(),
            reason: "transform exploded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("ingest"));
        assert!(text.contains("transform exploded"));
    }

    #[test]
    fn test_error_serialization_roundtrip() {
        let err = LifecycleError::HookFailed {
            name: "cache".to_string(),
            reason: "connection refused".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: LifecycleError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
