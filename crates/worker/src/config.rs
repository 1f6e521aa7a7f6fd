//! Worker pool configuration.

use crate::error::{PoolError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-task timeout in milliseconds.
pub const DEFAULT_TASK_TIMEOUT_MS: u64 = 60_000;

/// Default idle timeout in milliseconds.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;

/// Sizing and timing of a [`crate::WorkerPool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Workers kept alive at all times.
    pub min_workers: usize,
    /// Upper bound on concurrently running workers.
    pub max_workers: usize,
    /// Time a task may run before its worker is dropped.
    pub task_timeout_ms: u64,
    /// Idle time after which a surplus worker may retire. Carried for
    /// callers; the pool itself does not retire workers.
    pub idle_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            min_workers: 1,
            max_workers: cores.max(1),
            task_timeout_ms: DEFAULT_TASK_TIMEOUT_MS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of workers.
    pub fn with_min_workers(mut self, n: usize) -> Self {
        self.min_workers = n;
        self
    }

    /// Sets the maximum number of workers.
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    /// Sets the per-task timeout.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Sets the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(PoolError::InvalidConfig(
                "max_workers must be at least 1".into(),
            ));
        }
        if self.min_workers > self.max_workers {
            return Err(PoolError::InvalidConfig(format!(
                "min_workers ({}) exceeds max_workers ({})",
                self.min_workers, self.max_workers
            )));
        }
        if self.task_timeout_ms == 0 {
            return Err(PoolError::InvalidConfig(
                "task_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
