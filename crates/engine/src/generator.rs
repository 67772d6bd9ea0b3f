//! Periodic value generators.
//!
//! A `PeriodicGenerator` owns a [`Producer`], calls it once per period on a
//! dedicated worker thread, publishes the result as its latest value and
//! hands it to every registered observer.
//!
//! ## Suspension
//!
//! A tick runs entirely under the control lock, and `suspend()` takes the
//! same lock to flip the state. When `suspend()` returns, any in-flight tick
//! has completed and no further tick will publish until `resume()`. Tick
//! boundaries missed while suspended are skipped, not replayed, so the
//! output stream has a gap rather than a burst.

use crate::observer::GeneratorObserver;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tasknet_concurrency::LatestValue;
use tasknet_core::{Clock, Result, Tick};
use tracing::{debug, error, info};

/// Produces one value per tick.
pub trait Producer: Send + 'static {
    /// Value produced on every tick
    type Output: Clone + Send + Sync + 'static;

    /// Produce the value for the tick at `now`
    fn produce(&mut self, now: Tick) -> Self::Output;
}

/// Read access to the latest value of a stream.
pub trait ValueSource<T>: Send + Sync {
    /// Most recently published value, `None` before the first one
    fn current(&self) -> Option<T>;
}

impl<T: Clone + Send + Sync> ValueSource<T> for LatestValue<T> {
    fn current(&self) -> Option<T> {
        self.get()
    }
}

/// Something that can be paused and resumed.
pub trait Suspendable: Send + Sync {
    /// Stop producing. Returns `true` if this call moved the target from
    /// running to suspended. Returns only after any in-flight work finished.
    fn suspend(&self) -> bool;

    /// Start producing again. Returns `true` if this call moved the target
    /// from suspended to running.
    fn resume(&self) -> bool;
}

/// Lifecycle state of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Producing a value every period
    Running,
    /// Parked until resumed; the latest value stays readable
    Suspended,
    /// Shut down for good
    Stopped,
}

/// Resumes the target on drop, if this guard was the one that suspended it.
///
/// Guarantees resumption on every exit path, including early returns and
/// panics.
#[must_use = "the target resumes as soon as the guard is dropped"]
pub struct SuspendGuard<'a> {
    target: &'a dyn Suspendable,
    owned: bool,
}

impl<'a> SuspendGuard<'a> {
    /// Suspend `target` and hold it suspended until the guard drops.
    pub fn acquire(target: &'a dyn Suspendable) -> Self {
        let owned = target.suspend();
        SuspendGuard { target, owned }
    }

    /// Whether dropping this guard will resume the target
    pub fn owns_suspension(&self) -> bool {
        self.owned
    }
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        if self.owned {
            self.target.resume();
        }
    }
}

#[derive(Debug)]
struct Control {
    suspended: bool,
    shutdown: bool,
}

/// A producer driven on a fixed period.
pub struct PeriodicGenerator<P: Producer> {
    name: &'static str,
    period: Duration,
    producer: Mutex<P>,
    clock: Arc<dyn Clock>,
    latest: LatestValue<P::Output>,
    observers: Vec<Box<dyn GeneratorObserver<P::Output>>>,
    control: Mutex<Control>,
    control_changed: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Producer> PeriodicGenerator<P> {
    /// Create a generator. Nothing runs until [`spawn`](Self::spawn) or
    /// [`tick`](Self::tick) is called.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `period` is zero.
    pub fn new(
        name: &'static str,
        period: Duration,
        producer: P,
        clock: Arc<dyn Clock>,
        observers: Vec<Box<dyn GeneratorObserver<P::Output>>>,
    ) -> Result<Self> {
        if period.is_zero() {
            return Err(tasknet_core::Error::invalid_config(format!(
                "generator '{}' needs a non-zero period",
                name
            )));
        }
        Ok(PeriodicGenerator {
            name,
            period,
            producer: Mutex::new(producer),
            clock,
            latest: LatestValue::new(),
            observers,
            control: Mutex::new(Control {
                suspended: false,
                shutdown: false,
            }),
            control_changed: Condvar::new(),
            worker: Mutex::new(None),
        })
    }

    /// Generator name, also used for the worker thread
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Most recently published value
    pub fn latest(&self) -> Option<P::Output> {
        self.latest.get()
    }

    /// Number of values published so far
    pub fn ticks_published(&self) -> u64 {
        self.latest.publications()
    }

    /// Current lifecycle state
    pub fn state(&self) -> GeneratorState {
        let control = self.control.lock();
        if control.shutdown {
            GeneratorState::Stopped
        } else if control.suspended {
            GeneratorState::Suspended
        } else {
            GeneratorState::Running
        }
    }

    /// Run one tick now, unless suspended or stopped.
    ///
    /// Returns the published value. The worker thread calls this on every
    /// period boundary; tests call it directly for deterministic stepping.
    pub fn tick(&self) -> Option<P::Output> {
        let control = self.control.lock();
        self.tick_locked(&control)
    }

    /// Suspend until the returned guard is dropped.
    pub fn pause(&self) -> SuspendGuard<'_> {
        SuspendGuard::acquire(self)
    }

    fn tick_locked(&self, control: &Control) -> Option<P::Output> {
        if control.suspended || control.shutdown {
            return None;
        }
        let now = self.clock.now();
        let value = self.producer.lock().produce(now);
        self.latest.publish(value.clone());
        for observer in &self.observers {
            observer.observe(&value);
        }
        Some(value)
    }

    /// Start the worker thread, named `tasknet-<name>`.
    ///
    /// The first tick happens immediately. Calling `spawn` on a generator
    /// that already has a worker is a no-op.
    pub fn spawn(self: &Arc<Self>) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }
        let generator = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name(format!("tasknet-{}", self.name))
            .spawn(move || generator.run())?;
        *worker = Some(handle);
        info!(target: "tasknet::network", generator = self.name, period_ms = self.period.as_millis() as u64, "Generator started");
        Ok(())
    }

    /// Stop the worker thread and wait for it to exit.
    ///
    /// Idempotent. The latest value stays readable afterwards.
    pub fn shutdown(&self) {
        {
            // Notify under the lock so a worker between its shutdown check
            // and its wait cannot miss the wakeup
            let mut control = self.control.lock();
            control.shutdown = true;
            self.control_changed.notify_all();
        }
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                error!(target: "tasknet::network", generator = self.name, "Generator thread panicked");
            }
            info!(target: "tasknet::network", generator = self.name, "Generator stopped");
        }
    }

    fn run(&self) {
        let mut next = Instant::now();
        let mut realign = false;
        loop {
            {
                let mut control = self.control.lock();
                loop {
                    if control.shutdown {
                        return;
                    }
                    if control.suspended {
                        realign = true;
                        self.control_changed.wait(&mut control);
                        continue;
                    }
                    let now = Instant::now();
                    if realign {
                        next = next_boundary(next, self.period, now);
                        realign = false;
                    }
                    if now >= next {
                        break;
                    }
                    self.control_changed.wait_until(&mut control, next);
                }

                // A panicking producer or observer must not take the thread down
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    self.tick_locked(&control)
                }));
                if let Err(e) = outcome {
                    error!(
                        target: "tasknet::network",
                        generator = self.name,
                        "Generator tick panicked: {:?}",
                        e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
                    );
                }
            }
            next = next_boundary(next + self.period, self.period, Instant::now());
        }
    }
}

impl<P: Producer> Suspendable for PeriodicGenerator<P> {
    fn suspend(&self) -> bool {
        let mut control = self.control.lock();
        if control.suspended || control.shutdown {
            return false;
        }
        control.suspended = true;
        debug!(target: "tasknet::network", generator = self.name, "Generator suspended");
        true
    }

    fn resume(&self) -> bool {
        let mut control = self.control.lock();
        if !control.suspended {
            return false;
        }
        control.suspended = false;
        self.control_changed.notify_all();
        debug!(target: "tasknet::network", generator = self.name, "Generator resumed");
        true
    }
}

impl<P: Producer> ValueSource<P::Output> for PeriodicGenerator<P> {
    fn current(&self) -> Option<P::Output> {
        self.latest()
    }
}

/// First boundary of the `next + k * period` schedule strictly after `now`,
/// or `next` itself if it is still in the future.
fn next_boundary(next: Instant, period: Duration, now: Instant) -> Instant {
    if next > now {
        return next;
    }
    let behind = now.duration_since(next).as_nanos();
    let period_nanos = period.as_nanos().max(1);
    let skipped = (behind / period_nanos + 1).min(u128::from(u32::MAX)) as u32;
    next + period * skipped
}
