//! # U-Cutstock
//!
//! Cutting-stock optimization engine. A run loads a job and candidate stock
//! through caller-supplied lookups, routes linear jobs to the 1D bar packer
//! and rectangular jobs to the 2D sheet nester, and executes the packing on a
//! worker pool with an in-process fallback.
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutstock::{
//!     InMemoryJobs, InMemoryStock, JobItem, OptimizationEngine, OptimizationRequest, StockItem,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let jobs = InMemoryJobs::new().with_job(
//!     "frame",
//!     vec![JobItem::linear("rail", 1200.0).with_quantity(4)],
//! );
//! let stock = InMemoryStock::new(vec![StockItem::bar("bar-6m", 6000.0).with_available(2)]);
//!
//! let engine = OptimizationEngine::new(jobs, stock);
//! let outcome = engine
//!     .run_optimization(&OptimizationRequest::new("frame"))
//!     .await
//!     .unwrap();
//!
//! assert!(outcome.success);
//! assert_eq!(outcome.plan.unwrap().stock_used_count, 1);
//! # });
//! ```

pub mod engine;
pub mod error;
pub mod handler;
pub mod lookup;
pub mod plan;
pub mod request;

// Re-exports
pub use engine::OptimizationEngine;
pub use error::{EngineError, Result};
pub use handler::{packing_pool, PackingTaskHandler};
pub use lookup::{
    Geometry, InMemoryJobs, InMemoryStock, JobItem, JobLookup, LookupError, StockItem, StockKind,
    StockLookup, StockQuery,
};
pub use plan::{Layout, OptimizationOutcome, Plan};
pub use request::{EngineConfig, OptimizationRequest};

pub use u_cutstock_d1 as d1;
pub use u_cutstock_d2 as d2;
pub use u_cutstock_worker as worker;
