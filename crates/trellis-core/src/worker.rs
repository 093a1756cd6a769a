//! Background worker with superseding result delivery.
//!
//! [`Worker`] owns a dedicated thread that processes tasks sequentially from
//! a queue. Results are never delivered by mutating UI state from the worker
//! thread: they land in a thread-safe result queue that the UI thread drains
//! at its own pace via [`Worker::drain_results`].
//!
//! Every task targets a named slot (for example `"filter"` or `"stats"`) and
//! is stamped with a generation for that target. Submitting a new task for
//! the same target supersedes the previous one: a stale result that finishes
//! late is discarded at drain time and can never overwrite newer state.
//!
//! # Example
//!
//! ```
//! use trellis_core::Worker;
//!
//! let worker = Worker::<usize>::new();
//! worker.submit("stats", || 41);
//! worker.submit("stats", || 42); // supersedes the first task
//!
//! worker.join();
//! let mut results = Vec::new();
//! worker.drain_results(|target, value| results.push((target.to_string(), value)));
//! assert_eq!(results, vec![("stats".to_string(), 42)]);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

/// Configuration for creating a [`Worker`].
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name for the worker thread.
    pub name: String,
    /// Stack size for the worker thread in bytes. `None` uses the default.
    pub stack_size: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "trellis-worker".to_string(),
            stack_size: None,
        }
    }
}

/// Builder for workers with custom configuration.
#[derive(Debug, Default)]
pub struct WorkerBuilder {
    config: WorkerConfig,
}

impl WorkerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the stack size for the worker thread.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Builds and starts the worker.
    pub fn build<T: Send + 'static>(self) -> Worker<T> {
        Worker::with_config(self.config)
    }
}

enum WorkerTask<T> {
    Execute {
        target: String,
        generation: u64,
        task: Box<dyn FnOnce() -> T + Send>,
    },
    Shutdown,
}

struct TaggedResult<T> {
    target: String,
    generation: u64,
    value: T,
}

/// A dedicated worker thread with a task queue and superseding results.
///
/// # Type Parameter
///
/// - `T`: the result type produced by tasks. Must be `Send + 'static`.
///
/// # Thread Safety
///
/// `Worker<T>` is `Send + Sync`; tasks may be submitted from any thread,
/// though in Trellis submission and draining both happen on the UI thread.
pub struct Worker<T: Send + 'static> {
    task_tx: Sender<WorkerTask<T>>,
    result_rx: Receiver<TaggedResult<T>>,
    /// Latest generation submitted per target; stale results are dropped.
    generations: Arc<Mutex<HashMap<String, u64>>>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Default for Worker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Worker<T> {
    /// Creates and starts a worker with default configuration.
    pub fn new() -> Self {
        Self::with_config(WorkerConfig::default())
    }

    /// Creates and starts a worker with the given configuration.
    pub fn with_config(config: WorkerConfig) -> Self {
        let (task_tx, task_rx) = unbounded::<WorkerTask<T>>();
        let (result_tx, result_rx) = unbounded::<TaggedResult<T>>();
        let running = Arc::new(AtomicBool::new(true));

        let thread_running = running.clone();
        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(size) = config.stack_size {
            builder = builder.stack_size(size);
        }

        let handle = builder
            .spawn(move || {
                Self::run(task_rx, result_tx, thread_running);
            })
            .unwrap_or_else(|e| panic!("failed to spawn worker thread: {e}"));

        Self {
            task_tx,
            result_rx,
            generations: Arc::new(Mutex::new(HashMap::new())),
            running,
            handle: Mutex::new(Some(handle)),
        }
    }

    fn run(
        task_rx: Receiver<WorkerTask<T>>,
        result_tx: Sender<TaggedResult<T>>,
        running: Arc<AtomicBool>,
    ) {
        while let Ok(task) = task_rx.recv() {
            match task {
                WorkerTask::Execute {
                    target,
                    generation,
                    task,
                } => {
                    let value = task();
                    // The receiver only disappears when the handle is gone;
                    // results are then moot.
                    let _ = result_tx.send(TaggedResult {
                        target,
                        generation,
                        value,
                    });
                }
                WorkerTask::Shutdown => break,
            }
        }
        running.store(false, Ordering::Release);
    }

    /// Returns `true` if the worker thread is still processing tasks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Submits a task for the given target.
    ///
    /// The task supersedes any earlier task submitted for the same target
    /// whose result has not yet been drained. Returns `false` if the worker
    /// has been stopped.
    pub fn submit<F>(&self, target: &str, task: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if !self.is_running() {
            return false;
        }

        let generation = {
            let mut generations = self.generations.lock();
            let slot = generations.entry(target.to_string()).or_insert(0);
            *slot += 1;
            *slot
        };
        debug!(
            target: "trellis_core::worker",
            task_target = target,
            generation,
            "task submitted"
        );

        self.task_tx
            .send(WorkerTask::Execute {
                target: target.to_string(),
                generation,
                task: Box::new(task),
            })
            .is_ok()
    }

    /// Drains completed results, invoking `f` for each current one.
    ///
    /// Call this from the UI thread. Results whose generation has been
    /// superseded by a later `submit` for the same target are silently
    /// discarded here, so a slow computation can never clobber newer state.
    pub fn drain_results<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&str, T),
    {
        let mut delivered = 0;
        for result in self.result_rx.try_iter() {
            let current = self
                .generations
                .lock()
                .get(&result.target)
                .copied()
                .unwrap_or(0);
            if result.generation == current {
                f(&result.target, result.value);
                delivered += 1;
            } else {
                debug!(
                    target: "trellis_core::worker",
                    task_target = %result.target,
                    generation = result.generation,
                    current,
                    "discarding superseded result"
                );
            }
        }
        delivered
    }

    /// Requests a graceful stop after the queued tasks finish.
    pub fn stop(&self) {
        let _ = self.task_tx.send(WorkerTask::Shutdown);
    }

    /// Stops the worker and blocks until its thread has exited.
    pub fn join(&self) {
        self.stop();
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl<T: Send + 'static> Drop for Worker<T> {
    fn drop(&mut self) {
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_single_task_result() {
        let worker = Worker::<i32>::new();
        assert!(worker.submit("calc", || 7));
        worker.join();

        let mut results = Vec::new();
        worker.drain_results(|target, value| results.push((target.to_string(), value)));
        assert_eq!(results, vec![("calc".to_string(), 7)]);
    }

    #[test]
    fn test_superseded_result_discarded() {
        let worker = Worker::<&'static str>::new();
        worker.submit("filter", || {
            thread::sleep(Duration::from_millis(10));
            "first"
        });
        worker.submit("filter", || "second");
        worker.join();

        let mut results = Vec::new();
        worker.drain_results(|_, value| results.push(value));
        assert_eq!(results, vec!["second"]);
    }

    #[test]
    fn test_independent_targets_both_delivered() {
        let worker = Worker::<u32>::new();
        worker.submit("stats", || 1);
        worker.submit("filter", || 2);
        worker.join();

        let mut results = Vec::new();
        worker.drain_results(|target, value| results.push((target.to_string(), value)));
        results.sort();
        assert_eq!(
            results,
            vec![("filter".to_string(), 2), ("stats".to_string(), 1)]
        );
    }

    #[test]
    fn test_submit_after_stop_rejected() {
        let worker = Worker::<()>::new();
        worker.join();
        assert!(!worker.is_running());
        assert!(!worker.submit("late", || ()));
    }

    #[test]
    fn test_tasks_run_in_submission_order() {
        let worker = Worker::<usize>::new();
        for i in 0..4 {
            worker.submit(&format!("slot{i}"), move || i);
        }
        worker.join();

        let mut order = Vec::new();
        worker.drain_results(|_, value| order.push(value));
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
