//! Task execution seam.

use crate::protocol::TaskType;
use serde_json::Value;

/// Executes one task inside a worker thread.
///
/// Returning `Err` reports a task failure; panicking takes the worker down
/// and the pool replaces it.
pub trait TaskHandler: Send + Sync + 'static {
    fn handle(&self, task_type: TaskType, payload: Value) -> Result<Value, String>;
}

impl<F> TaskHandler for F
where
    F: Fn(TaskType, Value) -> Result<Value, String> + Send + Sync + 'static,
{
    fn handle(&self, task_type: TaskType, payload: Value) -> Result<Value, String> {
        self(task_type, payload)
    }
}
