//! Worker pool.
//!
//! Tasks are queued FIFO and handed to idle workers, spawning new workers
//! while below the configured maximum. A dedicated dispatcher thread receives
//! results from all workers and settles the matching caller futures. The
//! worker list, the queue and the pending map sit behind one mutex.

use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::handler::TaskHandler;
use crate::protocol::{TaskType, WorkerResult, WorkerTask};
use crate::worker::{self, WorkerEvent, WorkerId};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<Value>>;

/// Snapshot of pool activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub total_workers: usize,
    pub busy_workers: usize,
    pub idle_workers: usize,
    /// Tasks waiting for a worker.
    pub queued_tasks: usize,
    /// Tasks whose caller is still waiting, queued or running.
    pub pending_tasks: usize,
}

struct WorkerSlot {
    id: WorkerId,
    tasks: Sender<String>,
    handle: Option<JoinHandle<()>>,
    current: Option<String>,
}

struct QueuedTask {
    id: String,
    json: String,
}

#[derive(Default)]
struct PoolState {
    initialized: bool,
    shut_down: bool,
    next_worker: WorkerId,
    workers: Vec<WorkerSlot>,
    queue: VecDeque<QueuedTask>,
    pending: HashMap<String, Reply>,
    events: Option<Sender<WorkerEvent>>,
}

struct Inner {
    config: PoolConfig,
    handler: Arc<dyn TaskHandler>,
    state: Mutex<PoolState>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

/// Pool of worker threads executing [`TaskHandler`] tasks.
///
/// The owner calls [`WorkerPool::initialize`] before use and
/// [`WorkerPool::shutdown`] when done.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use serde_json::{json, Value};
/// use u_cutstock_worker::{PoolConfig, TaskType, WorkerPool};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let handler = |_: TaskType, payload: Value| -> Result<Value, String> { Ok(payload) };
/// let pool = WorkerPool::new(PoolConfig::new().with_max_workers(2), Arc::new(handler)).unwrap();
/// pool.initialize().unwrap();
///
/// let echoed = pool.execute(TaskType::Linear, json!({ "n": 1 })).await.unwrap();
/// assert_eq!(echoed, json!({ "n": 1 }));
///
/// pool.shutdown().await;
/// # });
/// ```
pub struct WorkerPool {
    inner: Arc<Inner>,
}

impl WorkerPool {
    /// Creates a pool. No thread is started until [`Self::initialize`].
    pub fn new(config: PoolConfig, handler: Arc<dyn TaskHandler>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                handler,
                state: Mutex::new(PoolState::default()),
                dispatcher: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Starts the result dispatcher and the minimum number of workers.
    ///
    /// Calling it again on a running pool does nothing.
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        if state.shut_down {
            return Err(PoolError::ShutDown);
        }
        if state.initialized {
            return Ok(());
        }

        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let inner = Arc::clone(&self.inner);
        let dispatcher = thread::Builder::new()
            .name("cutstock-dispatcher".into())
            .spawn(move || dispatch_events(inner, events_rx))?;
        *self.inner.dispatcher.lock() = Some(dispatcher);

        state.events = Some(events_tx);
        state.initialized = true;
        for _ in 0..self.inner.config.min_workers {
            self.inner.spawn_worker(&mut state)?;
        }

        log::info!(
            "worker pool started with {} workers (max {})",
            state.workers.len(),
            self.inner.config.max_workers
        );
        Ok(())
    }

    /// Runs a task on a worker and waits for its result.
    ///
    /// Fails with [`PoolError::Timeout`] when no result arrives within the
    /// task timeout; the worker running it is dropped and replaced.
    pub async fn execute(&self, task_type: TaskType, payload: Value) -> Result<Value> {
        let task = WorkerTask::new(task_type, payload);
        let id = task.id.clone();
        let json = task.to_json()?;
        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let mut state = self.inner.state.lock();
            if state.shut_down {
                return Err(PoolError::ShutDown);
            }
            if !state.initialized {
                return Err(PoolError::NotInitialized);
            }
            state.pending.insert(id.clone(), reply_tx);
            state.queue.push_back(QueuedTask {
                id: id.clone(),
                json,
            });
            log::debug!("queued {} task {}", task_type.as_str(), id);
            self.inner.dispatch(&mut state);
        }

        let timeout = self.inner.config.task_timeout();
        match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(PoolError::ShutDown),
            Err(_) => {
                self.inner.on_timeout(&id);
                Err(PoolError::Timeout(timeout))
            }
        }
    }

    /// Rejects queued and running tasks, disconnects every worker and joins
    /// the worker and dispatcher threads.
    pub async fn shutdown(&self) {
        let (handles, dispatcher) = {
            let mut state = self.inner.state.lock();
            if state.shut_down {
                return;
            }
            let handles = self.inner.close(&mut state);
            (handles, self.inner.dispatcher.lock().take())
        };

        let joined = tokio::task::spawn_blocking(move || {
            for handle in handles {
                if handle.join().is_err() {
                    log::warn!("worker thread ended with a panic");
                }
            }
            if let Some(dispatcher) = dispatcher {
                if dispatcher.join().is_err() {
                    log::warn!("dispatcher thread ended with a panic");
                }
            }
        })
        .await;

        if let Err(e) = joined {
            log::error!("failed to join pool threads: {}", e);
        }
        log::info!("worker pool shut down");
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.inner.state.lock();
        let total = state.workers.len();
        let busy = state.workers.iter().filter(|w| w.current.is_some()).count();
        PoolStats {
            total_workers: total,
            busy_workers: busy,
            idle_workers: total - busy,
            queued_tasks: state.queue.len(),
            pending_tasks: state.pending.len(),
        }
    }

    /// True if the pool is initialized, running and has a worker.
    pub fn is_healthy(&self) -> bool {
        let state = self.inner.state.lock();
        state.initialized && !state.shut_down && !state.workers.is_empty()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        if !state.shut_down {
            // Threads are left to exit on their own.
            let _ = self.inner.close(&mut state);
        }
    }
}

impl Inner {
    fn spawn_worker(&self, state: &mut PoolState) -> Result<()> {
        let events = state.events.clone().ok_or(PoolError::NotInitialized)?;
        let id = state.next_worker;
        state.next_worker += 1;

        let (tasks, handle) = worker::spawn(id, Arc::clone(&self.handler), events)?;
        state.workers.push(WorkerSlot {
            id,
            tasks,
            handle: Some(handle),
            current: None,
        });
        Ok(())
    }

    /// Spawns workers until the minimum is met.
    fn replenish(&self, state: &mut PoolState) {
        while state.workers.len() < self.config.min_workers {
            if let Err(e) = self.spawn_worker(state) {
                log::error!("could not replace worker: {}", e);
                break;
            }
        }
    }

    /// Hands queued tasks to idle workers, growing the pool up to the
    /// maximum.
    fn dispatch(&self, state: &mut PoolState) {
        if state.shut_down {
            return;
        }

        while !state.queue.is_empty() {
            let slot = match state.workers.iter().position(|w| w.current.is_none()) {
                Some(i) => i,
                None if state.workers.len() < self.config.max_workers => {
                    if let Err(e) = self.spawn_worker(state) {
                        log::error!("could not grow worker pool: {}", e);
                        return;
                    }
                    state.workers.len() - 1
                }
                None => return,
            };
            let Some(task) = state.queue.pop_front() else {
                return;
            };

            let worker = &mut state.workers[slot];
            match worker.tasks.send(task.json) {
                Ok(()) => worker.current = Some(task.id),
                Err(err) => {
                    log::warn!(
                        "worker {} disconnected, requeueing task {}",
                        worker.id,
                        task.id
                    );
                    state.workers.remove(slot);
                    state.queue.push_front(QueuedTask {
                        id: task.id,
                        json: err.into_inner(),
                    });
                    self.replenish(state);
                }
            }
        }
    }

    fn on_finished(&self, worker: WorkerId, text: &str) {
        let mut state = self.state.lock();
        if let Some(slot) = state.workers.iter_mut().find(|w| w.id == worker) {
            slot.current = None;
        }

        match WorkerResult::from_json(text) {
            Ok(result) => match state.pending.remove(&result.id) {
                Some(reply) => {
                    let outcome = if result.success {
                        Ok(result.result.unwrap_or(Value::Null))
                    } else {
                        Err(PoolError::TaskFailed(
                            result.error.unwrap_or_else(|| "unknown error".into()),
                        ))
                    };
                    let _ = reply.send(outcome);
                }
                None => log::debug!("discarding result of abandoned task {}", result.id),
            },
            Err(e) => log::error!("undecodable result from worker {}: {}", worker, e),
        }

        self.dispatch(&mut state);
    }

    fn on_crashed(&self, worker: WorkerId, task_id: &str, message: String) {
        let mut state = self.state.lock();
        if let Some(pos) = state.workers.iter().position(|w| w.id == worker) {
            state.workers.remove(pos);
        }
        self.replenish(&mut state);

        if let Some(reply) = state.pending.remove(task_id) {
            let _ = reply.send(Err(PoolError::WorkerCrashed(message)));
        }
        self.dispatch(&mut state);
    }

    fn on_timeout(&self, task_id: &str) {
        let mut state = self.state.lock();
        state.pending.remove(task_id);
        state.queue.retain(|t| t.id != task_id);

        let running = state
            .workers
            .iter()
            .position(|w| w.current.as_deref() == Some(task_id));
        if let Some(pos) = running {
            // Dropping the slot disconnects the worker and detaches its
            // thread; a late result finds no pending entry.
            let slot = state.workers.remove(pos);
            log::warn!("task {} timed out, dropping worker {}", task_id, slot.id);
        } else {
            log::warn!("task {} timed out before reaching a worker", task_id);
        }

        self.replenish(&mut state);
        self.dispatch(&mut state);
    }

    /// Marks the pool shut down, rejects every waiting caller and
    /// disconnects every worker. Returns the worker thread handles.
    fn close(&self, state: &mut PoolState) -> Vec<JoinHandle<()>> {
        state.shut_down = true;
        state.queue.clear();
        for (_, reply) in state.pending.drain() {
            let _ = reply.send(Err(PoolError::ShutDown));
        }

        let handles = state
            .workers
            .drain(..)
            .filter_map(|mut w| w.handle.take())
            .collect();

        if let Some(events) = state.events.take() {
            let _ = events.send(WorkerEvent::Stop);
        }
        handles
    }
}

fn dispatch_events(inner: Arc<Inner>, events: Receiver<WorkerEvent>) {
    while let Ok(event) = events.recv() {
        match event {
            WorkerEvent::Finished { worker, result } => inner.on_finished(worker, &result),
            WorkerEvent::Crashed {
                worker,
                task_id,
                message,
            } => inner.on_crashed(worker, &task_id, message),
            WorkerEvent::Stop => break,
        }
    }
    log::debug!("dispatcher stopped");
}
