//! # U-Cutstock Worker
//!
//! Worker-thread pool that runs CPU-bound packing tasks off the request path.
//!
//! ## Core Components
//!
//! - [`WorkerPool`]: FIFO task queue, per-task timeout, worker replacement
//! - [`TaskHandler`]: the work a worker performs for a task type and payload
//! - [`WorkerTask`] / [`WorkerResult`]: JSON envelopes exchanged with workers
//! - [`PoolConfig`]: worker counts and timeouts
//!
//! Tasks and results cross the thread boundary as JSON text over crossbeam
//! channels; callers await results through tokio oneshot channels.

pub mod config;
pub mod error;
pub mod handler;
pub mod pool;
pub mod protocol;
pub mod worker;

// Re-exports
pub use config::PoolConfig;
pub use error::{PoolError, Result};
pub use handler::TaskHandler;
pub use pool::{PoolStats, WorkerPool};
pub use protocol::{TaskType, WorkerResult, WorkerTask};
pub use worker::WorkerId;
