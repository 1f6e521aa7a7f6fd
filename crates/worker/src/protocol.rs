//! Messages exchanged with worker threads.
//!
//! Tasks and results cross the thread boundary as JSON text only.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of packing work a task carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Linear bar cutting.
    #[serde(rename = "1D")]
    Linear,
    /// Rectangular sheet nesting.
    #[serde(rename = "2D")]
    Sheet,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "1D",
            Self::Sheet => "2D",
        }
    }
}

/// A unit of work sent to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTask {
    /// Correlation identity (UUID v4).
    pub id: String,
    /// Kind of work.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Algorithm input.
    pub payload: Value,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl WorkerTask {
    /// Creates a task with a fresh identity.
    pub fn new(task_type: TaskType, payload: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_type,
            payload,
            timestamp: now_millis(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Outcome of a task, sent back by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResult {
    /// Identity of the task this answers.
    pub id: String,
    /// True if the handler returned a result.
    pub success: bool,
    /// Algorithm output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Handler error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time spent in the handler.
    pub execution_time_ms: u64,
}

impl WorkerResult {
    pub fn ok(id: impl Into<String>, result: Value, execution_time_ms: u64) -> Self {
        Self {
            id: id.into(),
            success: true,
            result: Some(result),
            error: None,
            execution_time_ms,
        }
    }

    pub fn err(id: impl Into<String>, error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            id: id.into(),
            success: false,
            result: None,
            error: Some(error.into()),
            execution_time_ms,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
