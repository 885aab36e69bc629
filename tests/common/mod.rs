/*!
 * Test Support
 * In-memory staged engine and recording observers
 */
#![allow(dead_code)]

use parking_lot::{Mutex, RwLock};
use runstage::{
    CancellationToken, LifecycleError, LifecycleObserver, LifecycleResult, Registration, Stage,
    StageListener, StagedLifecycle,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Opt-in log output for debugging test runs
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Poll `cond` until it holds or `deadline` elapses
pub fn wait_until(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

struct Subscription {
    id: u64,
    name: String,
    observer: Arc<dyn LifecycleObserver>,
}

/// Minimal staged engine: ascending start, descending stop, same-stage
/// observers grouped, completion reported to an optional listener
///
/// Startup aborts on the first failure; shutdown keeps unwinding and
/// surfaces the first failure at the end.
pub struct TestEngine {
    subscriptions: Arc<Mutex<BTreeMap<Stage, Vec<Subscription>>>>,
    listener: RwLock<Option<Arc<dyn StageListener>>>,
    next_id: AtomicU64,
}

impl TestEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscriptions: Arc::new(Mutex::new(BTreeMap::new())),
            listener: RwLock::new(None),
            next_id: AtomicU64::new(0),
        })
    }

    pub fn set_listener(&self, listener: Arc<dyn StageListener>) {
        *self.listener.write() = Some(listener);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().values().map(Vec::len).sum()
    }

    fn snapshot(&self) -> Vec<(Stage, Vec<Arc<dyn LifecycleObserver>>)> {
        self.subscriptions
            .lock()
            .iter()
            .map(|(stage, subs)| {
                (
                    *stage,
                    subs.iter().map(|s| Arc::clone(&s.observer)).collect(),
                )
            })
            .collect()
    }

    fn listener(&self) -> Option<Arc<dyn StageListener>> {
        self.listener.read().clone()
    }
}

impl StagedLifecycle for TestEngine {
    fn subscribe(
        &self,
        name: &str,
        stage: Stage,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Registration {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscriptions
            .lock()
            .entry(stage)
            .or_default()
            .push(Subscription {
                id,
                name: name.to_string(),
                observer,
            });

        let subscriptions = Arc::clone(&self.subscriptions);
        Registration::new(move || {
            let mut subs = subscriptions.lock();
            let now_empty = match subs.get_mut(&stage) {
                Some(group) => {
                    group.retain(|s| s.id != id);
                    group.is_empty()
                }
                None => false,
            };
            if now_empty {
                subs.remove(&stage);
            }
        })
    }

    fn start(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        for (stage, observers) in self.snapshot() {
            if cancel.is_cancelled() {
                return Err(LifecycleError::Canceled(stage));
            }
            let begun = Instant::now();
            for observer in &observers {
                observer.on_start(cancel)?;
            }
            if let Some(listener) = self.listener() {
                listener.on_stage_start_completed(stage, begun.elapsed());
            }
        }
        Ok(())
    }

    fn stop(&self, cancel: &CancellationToken) -> LifecycleResult<()> {
        let mut first_err = None;
        for (stage, observers) in self.snapshot().into_iter().rev() {
            let begun = Instant::now();
            for observer in &observers {
                if let Err(e) = observer.on_stop(cancel) {
                    first_err.get_or_insert(e);
                }
            }
            if let Some(listener) = self.listener() {
                listener.on_stage_stop_completed(stage, begun.elapsed());
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Shared, ordered record of lifecycle events across observers
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

/// Observer that records its hook invocations and can be told to fail
pub struct RecordingObserver {
    name: String,
    log: Arc<EventLog>,
    fail_start: bool,
    fail_stop: bool,
}

impl RecordingObserver {
    pub fn new(name: &str, log: Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log,
            fail_start: false,
            fail_stop: false,
        })
    }

    pub fn failing_start(name: &str, log: Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log,
            fail_start: true,
            fail_stop: false,
        })
    }

    pub fn failing_stop(name: &str, log: Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log,
            fail_start: false,
            fail_stop: true,
        })
    }
}

impl LifecycleObserver for RecordingObserver {
    fn on_start(&self, _cancel: &CancellationToken) -> LifecycleResult<()> {
        self.log.push(format!("start:{}", self.name));
        if self.fail_start {
            return Err(LifecycleError::HookFailed {
                name: self.name.clone(),
                reason: "induced start failure".to_string(),
            });
        }
        Ok(())
    }

    fn on_stop(&self, _cancel: &CancellationToken) -> LifecycleResult<()> {
        self.log.push(format!("stop:{}", self.name));
        if self.fail_stop {
            return Err(LifecycleError::HookFailed {
                name: self.name.clone(),
                reason: "induced stop failure".to_string(),
            });
        }
        Ok(())
    }
}
