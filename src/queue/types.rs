/*!
 * Queue Types
 * Worker status and queue statistics snapshots
 */

use crate::core::types::Stage;
use serde::{Deserialize, Serialize};

/// Worker lifecycle status for a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Queue constructed; worker thread not yet started
    Created,
    /// Worker thread is running (possibly idle, waiting for items)
    Running,
    /// Worker exited cleanly after observing cancellation
    Stopped,
    /// Worker exited on an unhandled error; terminal
    Faulted,
}

impl WorkerStatus {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Running,
            2 => Self::Stopped,
            _ => Self::Faulted,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Running => 1,
            Self::Stopped => 2,
            Self::Faulted => 3,
        }
    }

    /// Whether the worker is in the terminal fault state
    #[inline]
    pub fn is_faulted(self) -> bool {
        matches!(self, Self::Faulted)
    }
}

/// Point-in-time statistics for one queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub stage: Stage,
    pub status: WorkerStatus,
    pub pending: usize,
    pub ready: usize,
}
