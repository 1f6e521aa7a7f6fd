//! End-to-end engine runs through the in-memory lookups and a worker pool.

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use u_cutstock::d1::{Algorithm1D, Options1D};
use u_cutstock::d2::{Heuristic, Options2D};
use u_cutstock::worker::{PoolConfig, TaskHandler, TaskType, WorkerPool};
use u_cutstock::{
    packing_pool, EngineConfig, InMemoryJobs, InMemoryStock, JobItem, JobLookup, LookupError,
    OptimizationEngine, OptimizationRequest, PackingTaskHandler, StockItem, StockLookup,
    StockQuery,
};

fn jobs() -> InMemoryJobs {
    InMemoryJobs::new()
        .with_job(
            "rails",
            vec![
                JobItem::linear("R1", 1000.0).with_quantity(2).with_material("ALU"),
                JobItem::linear("R2", 1450.0).with_quantity(3).with_material("ALU"),
                JobItem::linear("R3", 380.0).with_quantity(7).with_material("ALU"),
            ],
        )
        .with_job(
            "cabinet",
            vec![
                JobItem::rectangular("side", 560.0, 720.0)
                    .with_quantity(2)
                    .with_material("MDF")
                    .with_thickness(18.0),
                JobItem::rectangular("shelf", 530.0, 300.0)
                    .with_quantity(5)
                    .with_material("MDF")
                    .with_thickness(18.0),
                JobItem::rectangular("back", 600.0, 760.0).with_material("MDF"),
            ],
        )
        .with_job(
            "mixed",
            vec![
                JobItem::linear("L", 500.0),
                JobItem::rectangular("P", 100.0, 100.0),
            ],
        )
        .with_job("empty", Vec::new())
}

fn stock() -> InMemoryStock {
    InMemoryStock::new(vec![
        StockItem::bar("ALU-6000", 6000.0)
            .with_material("ALU")
            .with_available(4)
            .with_unit_price(30.0),
        StockItem::bar("ALU-2400", 2400.0)
            .with_material("ALU")
            .with_available(10)
            .with_unit_price(13.0),
        StockItem::bar("STEEL-6000", 6000.0).with_material("STEEL"),
        StockItem::sheet("MDF-18", 1220.0, 2440.0)
            .with_material("MDF")
            .with_thickness(18.0)
            .with_available(3),
        StockItem::sheet("MDF-12", 1220.0, 2440.0)
            .with_material("MDF")
            .with_thickness(12.0),
        StockItem::bar("ANY-3000", 3000.0),
        StockItem::sheet("ANY-SHEET", 1000.0, 1000.0),
    ])
}

fn linear_request() -> OptimizationRequest {
    OptimizationRequest::new("rails").with_linear_options(
        Options1D::new()
            .with_algorithm(Algorithm1D::Bfd)
            .with_kerf(3.0)
            .with_min_usable_waste(200.0),
    )
}

fn sheet_request() -> OptimizationRequest {
    OptimizationRequest::new("cabinet")
        .with_sheet_options(Options2D::new().with_heuristic(Heuristic::Baf).with_kerf(4.0))
}

/// Counts tasks before running them.
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl TaskHandler for Counting {
    fn handle(&self, task_type: TaskType, payload: Value) -> Result<Value, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PackingTaskHandler.handle(task_type, payload)
    }
}

fn counting_pool(calls: &Arc<AtomicUsize>) -> Arc<WorkerPool> {
    let handler = Counting {
        calls: Arc::clone(calls),
    };
    let pool = WorkerPool::new(PoolConfig::new().with_max_workers(2), Arc::new(handler)).unwrap();
    pool.initialize().unwrap();
    Arc::new(pool)
}

#[tokio::test]
async fn test_pool_and_in_process_plans_identical() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pool = counting_pool(&calls);
    let pooled = OptimizationEngine::new(jobs(), stock()).with_pool(Arc::clone(&pool));
    let local = OptimizationEngine::new(jobs(), stock());

    for request in [linear_request(), sheet_request()] {
        let a = pooled.run_optimization(&request).await.unwrap();
        let b = local.run_optimization(&request).await.unwrap();
        assert!(a.success, "{:?}", a.error);
        assert_eq!(a, b);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    pool.shutdown().await;
}

#[tokio::test]
async fn test_linear_job_uses_matching_stock() {
    let engine = OptimizationEngine::new(jobs(), stock());
    let outcome = engine.run_optimization(&linear_request()).await.unwrap();

    assert!(outcome.success);
    let plan = outcome.plan.unwrap();
    assert_eq!(plan.unplaced_count, 0);
    assert!(plan.stock_used_count >= 3);
    for (i, layout) in plan.layouts.iter().enumerate() {
        assert_eq!(layout.sequence, i + 1);
        assert!(layout.stock_item_id.starts_with("ALU-"));
        assert_eq!(layout.layout_payload["stockId"], layout.stock_item_id.as_str());
    }
    assert!(plan.total_cost > 0.0);
}

#[tokio::test]
async fn test_stock_allow_list() {
    let engine = OptimizationEngine::new(jobs(), stock());
    let request = linear_request().with_stock_ids(["ALU-2400"]);
    let outcome = engine.run_optimization(&request).await.unwrap();

    assert!(outcome.success);
    let plan = outcome.plan.unwrap();
    assert!(plan
        .layouts
        .iter()
        .all(|layout| layout.stock_item_id == "ALU-2400"));
}

#[tokio::test]
async fn test_sheet_job_filters_thickness() {
    let engine = OptimizationEngine::new(jobs(), stock());
    let outcome = engine.run_optimization(&sheet_request()).await.unwrap();

    assert!(outcome.success, "{:?}", outcome.error);
    let plan = outcome.plan.unwrap();
    assert!(plan.layouts.iter().all(|l| l.stock_item_id == "MDF-18"));
    let placed: usize = plan
        .layouts
        .iter()
        .map(|l| l.layout_payload["placements"].as_array().map_or(0, |p| p.len()))
        .sum();
    assert_eq!(placed, 8);
}

#[tokio::test]
async fn test_mixed_geometry_routes_on_first_item() {
    let engine = OptimizationEngine::new(jobs(), stock());
    let outcome = engine
        .run_optimization(&OptimizationRequest::new("mixed"))
        .await
        .unwrap();

    assert!(outcome.success);
    let plan = outcome.plan.unwrap();
    assert_eq!(plan.layouts.len(), 1);
    assert_eq!(plan.layouts[0].layout_payload["cuts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_and_empty_jobs() {
    let engine = OptimizationEngine::new(jobs(), stock());

    let outcome = engine
        .run_optimization(&OptimizationRequest::new("missing"))
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome.plan.is_none());
    assert!(outcome.error.unwrap().contains("job missing not found"));

    let outcome = engine
        .run_optimization(&OptimizationRequest::new("empty"))
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Job empty has no items"));
}

#[tokio::test]
async fn test_no_matching_stock() {
    let engine = OptimizationEngine::new(jobs(), stock());
    let request = linear_request().with_stock_ids(["MDF-18"]);
    let outcome = engine.run_optimization(&request).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.plan.is_none());
}

struct FailingStock;

impl StockLookup for FailingStock {
    async fn find_stock(&self, _: &StockQuery) -> Result<Vec<StockItem>, LookupError> {
        Err(LookupError::Unavailable("inventory offline".to_string()))
    }
}

struct CountingJobs {
    inner: InMemoryJobs,
    calls: Arc<AtomicUsize>,
}

impl JobLookup for CountingJobs {
    async fn job_items(&self, job_id: &str) -> Result<Vec<JobItem>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.job_items(job_id).await
    }
}

#[tokio::test]
async fn test_stock_lookup_failure_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let jobs = CountingJobs {
        inner: jobs(),
        calls: Arc::clone(&calls),
    };
    let engine = OptimizationEngine::new(jobs, FailingStock);
    let outcome = engine.run_optimization(&linear_request()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("inventory offline"));
    assert!(outcome.plan.is_none());
}

#[tokio::test]
async fn test_crashing_pool_falls_back() {
    let handler = |_: TaskType, _: Value| -> Result<Value, String> { panic!("worker fault") };
    let pool = WorkerPool::new(
        PoolConfig::new().with_min_workers(1).with_max_workers(1),
        Arc::new(handler),
    )
    .unwrap();
    pool.initialize().unwrap();
    let pool = Arc::new(pool);

    let engine = OptimizationEngine::new(jobs(), stock()).with_pool(Arc::clone(&pool));
    let local = OptimizationEngine::new(jobs(), stock());

    let request = sheet_request();
    let outcome = engine.run_optimization(&request).await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome, local.run_optimization(&request).await.unwrap());

    assert_eq!(engine.pool_stats().unwrap().total_workers, 1);
    pool.shutdown().await;
}

#[tokio::test]
async fn test_hung_pool_falls_back_after_timeout() {
    let handler = |_: TaskType, _: Value| -> Result<Value, String> {
        std::thread::sleep(Duration::from_millis(400));
        Err("too late".to_string())
    };
    let pool = WorkerPool::new(
        PoolConfig::new()
            .with_max_workers(1)
            .with_task_timeout(Duration::from_millis(50)),
        Arc::new(handler),
    )
    .unwrap();
    pool.initialize().unwrap();
    let pool = Arc::new(pool);

    let engine = OptimizationEngine::new(jobs(), stock()).with_pool(Arc::clone(&pool));
    let outcome = engine.run_optimization(&linear_request()).await.unwrap();
    assert!(outcome.success);

    pool.shutdown().await;
}

#[tokio::test]
async fn test_shut_down_pool_skipped() {
    let pool = Arc::new(packing_pool(PoolConfig::new()).unwrap());
    pool.initialize().unwrap();
    pool.shutdown().await;

    let engine = OptimizationEngine::new(jobs(), stock()).with_pool(Arc::clone(&pool));
    let outcome = engine.run_optimization(&linear_request()).await.unwrap();
    assert!(outcome.success);
    assert_eq!(engine.pool_stats().unwrap().total_workers, 0);
}

#[tokio::test]
async fn test_engine_defaults_apply() {
    let config = EngineConfig::new()
        .with_use_pool(false)
        .with_linear(Options1D::new().with_algorithm(Algorithm1D::Ffd).with_kerf(5.0));
    let engine = OptimizationEngine::new(jobs(), stock()).with_config(config);

    let outcome = engine
        .run_optimization(&OptimizationRequest::new("rails"))
        .await
        .unwrap();
    let plan = outcome.plan.unwrap();
    let cuts = plan.layouts[0].layout_payload["cuts"].as_array().unwrap();
    let first_end = cuts[0]["position"].as_f64().unwrap() + cuts[0]["length"].as_f64().unwrap();
    assert_eq!(cuts[1]["position"].as_f64().unwrap(), first_end + 5.0);
    assert!(engine.pool_stats().is_none());
}
