/*!
 * Core Types
 * Common types shared by the lifecycle and queue modules
 */

use serde::{Deserialize, Serialize};

/// Stage ordering key; lower stages start earlier and stop later
pub type Stage = i32;

/// One stage group in the computed startup plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlanEntry {
    /// Numeric stage this group runs at
    pub stage: Stage,
    /// Resolved display name for the stage
    pub stage_name: String,
    /// Participant names registered at this stage, in registration order
    pub members: Vec<String>,
}
