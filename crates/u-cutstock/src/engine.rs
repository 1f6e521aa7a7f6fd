//! Optimization engine.
//!
//! A run fetches the job, fetches matching stock, routes on the geometry of
//! the first job item and packs either on the worker pool or in-process.

use crate::error::Result;
use crate::lookup::{Geometry, JobItem, JobLookup, StockItem, StockLookup, StockQuery};
use crate::plan::OptimizationOutcome;
use crate::request::{EngineConfig, OptimizationRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use u_cutstock_core::Error;
use u_cutstock_d1::{CuttingRequest1D, Options1D, Piece1D, Stock1D};
use u_cutstock_d2::{CuttingRequest2D, Options2D, Piece2D, Stock2D};
use u_cutstock_worker::{PoolStats, TaskType, WorkerPool};

/// Orchestrates optimization runs.
///
/// The engine never owns the pool lifecycle: the caller initializes the
/// [`WorkerPool`] it attaches and shuts it down when done.
pub struct OptimizationEngine<J, S> {
    jobs: J,
    stock: S,
    pool: Option<Arc<WorkerPool>>,
    config: EngineConfig,
}

impl<J: JobLookup, S: StockLookup> OptimizationEngine<J, S> {
    /// Creates an engine that packs in-process.
    pub fn new(jobs: J, stock: S) -> Self {
        Self {
            jobs,
            stock,
            pool: None,
            config: EngineConfig::default(),
        }
    }

    /// Attaches a worker pool.
    pub fn with_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Statistics of the attached pool.
    pub fn pool_stats(&self) -> Option<PoolStats> {
        self.pool.as_ref().map(|pool| pool.stats())
    }

    /// Runs one optimization.
    ///
    /// Lookup failures, empty jobs and packing failures come back as an
    /// unsuccessful outcome. Nothing is retried.
    pub async fn run_optimization(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationOutcome> {
        let items = match self.jobs.job_items(&request.job_id).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("job lookup for {} failed: {}", request.job_id, e);
                return Ok(OptimizationOutcome::failure(format!(
                    "Failed to load job {}: {}",
                    request.job_id, e
                )));
            }
        };
        let Some(first) = items.first() else {
            return Ok(OptimizationOutcome::failure(format!(
                "Job {} has no items",
                request.job_id
            )));
        };

        let geometry = first.geometry;
        let query = StockQuery {
            kind: geometry.stock_kind(),
            material: first.material.clone(),
            thickness: first.thickness,
            ids: request.stock_ids.clone(),
        };
        let stock = match self.stock.find_stock(&query).await {
            Ok(stock) => stock,
            Err(e) => {
                log::warn!("stock lookup for {} failed: {}", request.job_id, e);
                return Ok(OptimizationOutcome::failure(format!(
                    "Failed to load stock: {}",
                    e
                )));
            }
        };
        if stock.is_empty() {
            return Ok(OptimizationOutcome::failure(format!(
                "No stock matches job {}",
                request.job_id
            )));
        }

        let (items, ignored): (Vec<JobItem>, Vec<JobItem>) =
            items.into_iter().partition(|item| item.geometry == geometry);
        if !ignored.is_empty() {
            log::warn!(
                "job {} mixes geometries; ignoring {} item(s) that are not {:?}",
                request.job_id,
                ignored.len(),
                geometry
            );
        }

        log::info!(
            "optimizing job {}: {} item(s), {} stock item(s), {:?}",
            request.job_id,
            items.len(),
            stock.len(),
            geometry
        );

        match geometry {
            Geometry::Linear => {
                let options = self.config.linear_options(request);
                let cutting = match linear_request(&items, &stock, options) {
                    Ok(cutting) => cutting,
                    Err(e) => return Ok(OptimizationOutcome::failure(e.to_string())),
                };
                let plan = self
                    .dispatch(TaskType::Linear, &cutting, u_cutstock_d1::solve_request)
                    .await?;
                Ok(OptimizationOutcome::from_linear(&plan)?)
            }
            Geometry::Rectangular => {
                let options = self.config.sheet_options(request);
                let cutting = match sheet_request(&items, &stock, options) {
                    Ok(cutting) => cutting,
                    Err(e) => return Ok(OptimizationOutcome::failure(e.to_string())),
                };
                let plan = self
                    .dispatch(TaskType::Sheet, &cutting, u_cutstock_d2::solve_request)
                    .await?;
                Ok(OptimizationOutcome::from_sheets(&plan)?)
            }
        }
    }

    /// Packs on the pool when possible, otherwise in-process.
    async fn dispatch<R, P>(&self, task_type: TaskType, request: &R, solve: fn(&R) -> P) -> Result<P>
    where
        R: Serialize + Sync,
        P: DeserializeOwned,
    {
        let pool = self
            .pool
            .as_ref()
            .filter(|pool| self.config.use_pool && pool.is_healthy());

        if let Some(pool) = pool {
            let payload = serde_json::to_value(request)?;
            match pool.execute(task_type, payload).await {
                Ok(value) => match serde_json::from_value::<P>(value) {
                    Ok(plan) => return Ok(plan),
                    Err(e) => log::warn!(
                        "unreadable {} plan from worker pool, running in-process: {}",
                        task_type.as_str(),
                        e
                    ),
                },
                Err(e) => log::warn!(
                    "worker pool failed on {} task, running in-process: {}",
                    task_type.as_str(),
                    e
                ),
            }
        } else if self.pool.is_some() {
            log::debug!("worker pool unavailable, running {} task in-process", task_type.as_str());
        }

        Ok(solve(request))
    }
}

fn dimension(item: &JobItem, value: Option<f64>, name: &str) -> u_cutstock_core::Result<f64> {
    value.ok_or_else(|| Error::InvalidPiece(format!("item {} has no {}", item.id, name)))
}

fn linear_request(
    items: &[JobItem],
    stock: &[StockItem],
    options: Options1D,
) -> u_cutstock_core::Result<CuttingRequest1D> {
    let pieces = items
        .iter()
        .map(|item| {
            let length = dimension(item, item.length, "length")?;
            Ok(Piece1D::new(item.id.clone(), length).with_quantity(item.quantity))
        })
        .collect::<u_cutstock_core::Result<Vec<_>>>()?;

    let stock = stock
        .iter()
        .filter_map(|s| match s.length {
            Some(length) => {
                let mut bar = Stock1D::new(s.id.clone(), length).with_available(s.available);
                bar.unit_price = s.unit_price;
                Some(bar)
            }
            None => {
                log::warn!("stock {} has no length; skipped", s.id);
                None
            }
        })
        .collect();

    Ok(CuttingRequest1D {
        pieces,
        stock,
        options,
    })
}

fn sheet_request(
    items: &[JobItem],
    stock: &[StockItem],
    options: Options2D,
) -> u_cutstock_core::Result<CuttingRequest2D> {
    let pieces = items
        .iter()
        .map(|item| {
            let width = dimension(item, item.width, "width")?;
            let height = dimension(item, item.height, "height")?;
            let mut piece = Piece2D::new(item.id.clone(), width, height)
                .with_quantity(item.quantity)
                .with_rotation(item.can_rotate);
            piece.grain = item.grain;
            Ok(piece)
        })
        .collect::<u_cutstock_core::Result<Vec<_>>>()?;

    let stock = stock
        .iter()
        .filter_map(|s| match (s.width, s.height) {
            (Some(width), Some(height)) => {
                let mut sheet =
                    Stock2D::new(s.id.clone(), width, height).with_available(s.available);
                sheet.unit_price = s.unit_price;
                Some(sheet)
            }
            _ => {
                log::warn!("stock {} has no width or height; skipped", s.id);
                None
            }
        })
        .collect();

    Ok(CuttingRequest2D {
        pieces,
        stock,
        options,
    })
}
