/*!
 * Runtime Limits and Thresholds
 *
 * Centralized location for timing thresholds and worker wait intervals.
 * All values include rationale comments explaining why they exist.
 */

use std::time::Duration;

// =============================================================================
// LIFECYCLE THRESHOLDS
// =============================================================================

/// Shutdown duration above which a single participant is flagged as slow (1s)
/// Slow teardown is the leading indicator of leaked resources at process exit
pub const SLOW_STOP_THRESHOLD: Duration = Duration::from_secs(1);

/// Stage-group completion duration above which the stage is flagged (1s)
/// A whole stage over this threshold usually means one participant is dragging
pub const SLOW_STAGE_THRESHOLD: Duration = Duration::from_secs(1);

// =============================================================================
// WORK QUEUE INTERVALS
// =============================================================================

/// Bounded wait between readiness re-checks when the head item is gated (25ms)
/// Short enough to pick up external state changes promptly; enqueue and
/// recheck signals cut it short
pub const GATE_RECHECK_INTERVAL: Duration = Duration::from_millis(25);

/// Bounded wait while the pending queue is empty (100ms)
/// The worker re-checks cancellation on every wakeup, so stop latency for an
/// idle queue is capped by this interval even if a notification is missed
pub const IDLE_WAIT_INTERVAL: Duration = Duration::from_millis(100);
