/*!
 * Queue Module
 * Lifecycle-integrated work queues with a dedicated worker thread
 */

pub mod types;
pub mod work;

// Re-export public API
pub use types::{QueueStats, WorkerStatus};
pub use work::{SimpleWorkQueue, WorkHandler, WorkQueue};
