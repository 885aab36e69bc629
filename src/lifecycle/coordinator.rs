/*!
 * Lifecycle Coordinator
 * Instrumentation decorator over a staged orchestration engine
 *
 * Registers participants as monitored observers, logs the computed stage
 * plan before startup, and tracks how far startup got and how far shutdown
 * unwound. It adds observability only; traversal order and failure policy
 * belong to the engine.
 */

use super::monitored::MonitoredObserver;
use super::observer::{LifecycleObserver, Registration, StageListener, StagedLifecycle};
use super::resolver::{fallback_stage_name, StageResolver};
use crate::core::errors::LifecycleResult;
use crate::core::limits::SLOW_STAGE_THRESHOLD;
use crate::core::types::{Stage, StagePlanEntry};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sentinel: no stage has completed startup yet
const NO_STAGE_COMPLETED: i64 = i64::MIN;

/// Sentinel: no stage has completed shutdown yet
const NO_STAGE_STOPPED: i64 = i64::MAX;

struct StageGroup {
    stage_name: String,
    members: Vec<String>,
}

/// Decorator over a staged engine adding registration instrumentation,
/// plan logging, and progress tracking
pub struct LifecycleCoordinator {
    engine: Arc<dyn StagedLifecycle>,
    resolver: Arc<dyn StageResolver>,
    // Instance-owned so multiple coordinators coexist without interference
    registry: RwLock<BTreeMap<Stage, StageGroup>>,
    highest_completed: AtomicI64,
    lowest_stopped: AtomicI64,
}

impl LifecycleCoordinator {
    pub fn new(engine: Arc<dyn StagedLifecycle>, resolver: Arc<dyn StageResolver>) -> Self {
        Self {
            engine,
            resolver,
            registry: RwLock::new(BTreeMap::new()),
            highest_completed: AtomicI64::new(NO_STAGE_COMPLETED),
            lowest_stopped: AtomicI64::new(NO_STAGE_STOPPED),
        }
    }

    /// Register a participant at a stage
    ///
    /// Wraps the observer in a `MonitoredObserver` with a resolved stage
    /// display name, records it for plan logging, and forwards the wrapped
    /// observer to the engine. Safe to call concurrently during bootstrap.
    pub fn register(
        &self,
        name: &str,
        stage: Stage,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Registration {
        let stage_name = self.resolve_stage_name(stage);
        let monitored = Arc::new(MonitoredObserver::new(
            name,
            stage,
            stage_name.clone(),
            observer,
        ));

        {
            let mut registry = self.registry.write();
            let group = registry.entry(stage).or_insert_with(|| StageGroup {
                stage_name,
                members: Vec::new(),
            });
            group.members.push(name.to_string());
        }

        debug!(name, stage, "registered lifecycle participant");
        self.engine.subscribe(name, stage, monitored)
    }

    /// Start all participants in ascending stage order
    ///
    /// Logs the full stage plan once, then delegates to the engine. The plan
    /// log is purely observational.
    pub fn start(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        self.log_stage_plan();
        self.engine.start(cancel)
    }

    /// Stop all participants in descending stage order
    pub fn stop(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        self.engine.stop(cancel)
    }

    /// Snapshot of the computed plan, ascending by stage
    pub fn stage_plan(&self) -> Vec<StagePlanEntry> {
        let registry = self.registry.read();
        registry
            .iter()
            .map(|(stage, group)| StagePlanEntry {
                stage: *stage,
                stage_name: group.stage_name.clone(),
                members: group.members.clone(),
            })
            .collect()
    }

    /// Display name for a stage: resolver hit or structural fallback
    pub fn resolve_stage_name(&self, stage: Stage) -> String {
        self.resolver
            .resolve(stage)
            .unwrap_or_else(|| fallback_stage_name(stage))
    }

    /// Highest stage whose startup pass fully completed, if any
    pub fn highest_completed_stage(&self) -> Option<Stage> {
        match self.highest_completed.load(Ordering::Acquire) {
            NO_STAGE_COMPLETED => None,
            stage => Some(stage as Stage),
        }
    }

    /// Lowest stage reached during shutdown, if any
    pub fn lowest_stopped_stage(&self) -> Option<Stage> {
        match self.lowest_stopped.load(Ordering::Acquire) {
            NO_STAGE_STOPPED => None,
            stage => Some(stage as Stage),
        }
    }

    fn log_stage_plan(&self) {
        let registry = self.registry.read();
        let plan = registry
            .iter()
            .map(|(stage, group)| {
                format!(
                    "{} ({}): [{}]",
                    stage,
                    group.stage_name,
                    group.members.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        info!(stages = registry.len(), plan = %plan, "lifecycle stage plan");
    }
}

impl StageListener for LifecycleCoordinator {
    fn on_stage_start_completed(&self, stage: Stage, elapsed: Duration) {
        // Monotonic: concurrent completion callbacks can never regress this
        self.highest_completed
            .fetch_max(i64::from(stage), Ordering::AcqRel);
        if elapsed > SLOW_STAGE_THRESHOLD {
            warn!(
                stage,
                elapsed_ms = elapsed.as_millis() as u64,
                "stage startup completed slowly"
            );
        } else {
            debug!(
                stage,
                elapsed_ms = elapsed.as_millis() as u64,
                "stage startup completed"
            );
        }
    }

    fn on_stage_stop_completed(&self, stage: Stage, elapsed: Duration) {
        self.lowest_stopped
            .fetch_min(i64::from(stage), Ordering::AcqRel);
        if elapsed > SLOW_STAGE_THRESHOLD {
            warn!(
                stage,
                elapsed_ms = elapsed.as_millis() as u64,
                "stage shutdown completed slowly"
            );
        } else {
            debug!(
                stage,
                elapsed_ms = elapsed.as_millis() as u64,
                "stage shutdown completed"
            );
        }
    }
}
