/*!
 * Stage Name Resolution
 * Maps numeric stages to display names for plan logging
 */

use crate::core::types::Stage;
use std::collections::BTreeMap;

/// Maps a numeric stage to a human-readable name
pub trait StageResolver: Send + Sync {
    /// Resolved display name, if one is known for this stage
    fn resolve(&self, stage: Stage) -> Option<String>;
}

/// Textual fallback for stages without a resolved name
#[inline]
pub(crate) fn fallback_stage_name(stage: Stage) -> String {
    format!("Stage {}", stage)
}

/// Map-backed resolver populated at construction
#[derive(Debug, Clone, Default)]
pub struct StaticStageResolver {
    names: BTreeMap<Stage, String>,
}

impl StaticStageResolver {
    pub fn new() -> Self {
        Self {
            names: BTreeMap::new(),
        }
    }

    /// Add a display name for a stage
    #[must_use]
    pub fn with_stage(mut self, stage: Stage, name: impl Into<String>) -> Self {
        self.names.insert(stage, name.into());
        self
    }
}

impl StageResolver for StaticStageResolver {
    fn resolve(&self, stage: Stage) -> Option<String> {
        self.names.get(&stage).cloned()
    }
}
