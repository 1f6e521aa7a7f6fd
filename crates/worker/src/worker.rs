//! Worker threads.

use crate::error::Result;
use crate::handler::TaskHandler;
use crate::protocol::{WorkerResult, WorkerTask};
use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Identifier of a worker within its pool.
pub type WorkerId = usize;

/// Messages flowing from workers (and the pool) to the result dispatcher.
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    /// A task finished; `result` is a JSON-encoded [`WorkerResult`].
    Finished { worker: WorkerId, result: String },
    /// The handler panicked; the worker thread has exited.
    Crashed {
        worker: WorkerId,
        task_id: String,
        message: String,
    },
    /// Stop the dispatcher.
    Stop,
}

/// Spawns a worker thread.
///
/// The worker runs tasks received on its own channel until that channel is
/// disconnected or the handler panics.
pub(crate) fn spawn(
    id: WorkerId,
    handler: Arc<dyn TaskHandler>,
    events: Sender<WorkerEvent>,
) -> Result<(Sender<String>, JoinHandle<()>)> {
    let (tasks_tx, tasks_rx) = crossbeam_channel::unbounded::<String>();
    let handle = thread::Builder::new()
        .name(format!("cutstock-worker-{}", id))
        .spawn(move || run(id, handler, tasks_rx, events))?;
    Ok((tasks_tx, handle))
}

fn run(id: WorkerId, handler: Arc<dyn TaskHandler>, tasks: Receiver<String>, events: Sender<WorkerEvent>) {
    log::debug!("worker {} started", id);

    while let Ok(text) = tasks.recv() {
        let task = match WorkerTask::from_json(&text) {
            Ok(task) => task,
            Err(e) => {
                log::error!("worker {} received malformed task: {}", id, e);
                let reply = WorkerResult::err("", e.to_string(), 0);
                if !send_result(id, &events, &reply) {
                    break;
                }
                continue;
            }
        };

        let started = Instant::now();
        let task_id = task.id.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.handle(task.task_type, task.payload)
        }));
        let elapsed = started.elapsed().as_millis() as u64;

        let reply = match outcome {
            Ok(Ok(value)) => WorkerResult::ok(task_id, value, elapsed),
            Ok(Err(message)) => WorkerResult::err(task_id, message, elapsed),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("worker {} panicked on task {}: {}", id, task_id, message);
                let _ = events.send(WorkerEvent::Crashed {
                    worker: id,
                    task_id,
                    message,
                });
                return;
            }
        };

        if !send_result(id, &events, &reply) {
            break;
        }
    }

    log::debug!("worker {} stopped", id);
}

/// Encodes and sends a result. Returns false if the dispatcher is gone.
fn send_result(id: WorkerId, events: &Sender<WorkerEvent>, reply: &WorkerResult) -> bool {
    let result = match reply.to_json() {
        Ok(text) => text,
        Err(e) => {
            // The caller sees a timeout for this task.
            log::error!("worker {} could not encode result {}: {}", id, reply.id, e);
            return true;
        }
    };
    events
        .send(WorkerEvent::Finished { worker: id, result })
        .is_ok()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TaskType;
    use serde_json::{json, Value};

    fn echo(_: TaskType, payload: Value) -> std::result::Result<Value, String> {
        if payload.is_null() {
            Err("empty payload".to_string())
        } else {
            Ok(payload)
        }
    }

    #[test]
    fn test_worker_round_trip() {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let (tasks, handle) = spawn(3, Arc::new(echo), events_tx).unwrap();

        let task = WorkerTask::new(TaskType::Linear, json!({ "n": 1 }));
        tasks.send(task.to_json().unwrap()).unwrap();

        match events_rx.recv().unwrap() {
            WorkerEvent::Finished { worker, result } => {
                assert_eq!(worker, 3);
                let result = WorkerResult::from_json(&result).unwrap();
                assert_eq!(result.id, task.id);
                assert!(result.success);
                assert_eq!(result.result, Some(json!({ "n": 1 })));
            }
            other => panic!("unexpected event {:?}", other),
        }

        let task = WorkerTask::new(TaskType::Linear, Value::Null);
        tasks.send(task.to_json().unwrap()).unwrap();
        match events_rx.recv().unwrap() {
            WorkerEvent::Finished { result, .. } => {
                let result = WorkerResult::from_json(&result).unwrap();
                assert!(!result.success);
                assert_eq!(result.error.as_deref(), Some("empty payload"));
            }
            other => panic!("unexpected event {:?}", other),
        }

        drop(tasks);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_panic_reported() {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let handler = |_: TaskType, _: Value| -> std::result::Result<Value, String> {
            panic!("boom")
        };
        let (tasks, handle) = spawn(0, Arc::new(handler), events_tx).unwrap();

        let task = WorkerTask::new(TaskType::Sheet, Value::Null);
        tasks.send(task.to_json().unwrap()).unwrap();

        match events_rx.recv().unwrap() {
            WorkerEvent::Crashed { task_id, message, .. } => {
                assert_eq!(task_id, task.id);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected event {:?}", other),
        }
        handle.join().unwrap();
    }
}
