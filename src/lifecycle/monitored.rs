/*!
 * Monitored Observer
 * Instrumentation wrapper timing one participant's start/stop hooks
 */

use super::observer::LifecycleObserver;
use crate::core::errors::LifecycleResult;
use crate::core::limits::SLOW_STOP_THRESHOLD;
use crate::core::types::Stage;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Wraps one observer's hooks with timing and failure logging
///
/// Failures are logged with the observer's name and stage, then re-raised
/// unchanged; the wrapper never converts a hook failure into a silent no-op.
pub struct MonitoredObserver {
    name: String,
    stage: Stage,
    stage_name: String,
    inner: Arc<dyn LifecycleObserver>,
}

impl MonitoredObserver {
    pub fn new(
        name: impl Into<String>,
        stage: Stage,
        stage_name: impl Into<String>,
        inner: Arc<dyn LifecycleObserver>,
    ) -> Self {
        Self {
            name: name.into(),
            stage,
            stage_name: stage_name.into(),
            inner,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }
}

impl LifecycleObserver for MonitoredObserver {
    fn on_start(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        let started = Instant::now();
        match self.inner.on_start(cancel) {
            Ok(()) => {
                debug!(
                    name = %self.name,
                    stage = self.stage,
                    stage_name = %self.stage_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "observer started"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    name = %self.name,
                    stage = self.stage,
                    error = %e,
                    "observer failed to start"
                );
                Err(e)
            }
        }
    }

    fn on_stop(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        debug!(name = %self.name, stage = self.stage, "stopping observer");
        let started = Instant::now();
        match self.inner.on_stop(cancel) {
            Ok(()) => {
                let elapsed = started.elapsed();
                if elapsed > SLOW_STOP_THRESHOLD {
                    warn!(
                        name = %self.name,
                        stage = self.stage,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "observer stopped slowly"
                    );
                } else {
                    debug!(
                        name = %self.name,
                        stage = self.stage,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "observer stopped"
                    );
                }
                Ok(())
            }
            Err(e) => {
                error!(
                    name = %self.name,
                    stage = self.stage,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "observer failed to stop"
                );
                Err(e)
            }
        }
    }
}
