//! Integration tests for u-cutstock-worker.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use u_cutstock_worker::{PoolConfig, PoolError, TaskType, WorkerPool};

fn handler(task_type: TaskType, payload: Value) -> Result<Value, String> {
    let ms = payload["sleepMs"].as_u64().unwrap_or(0);
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(ms));
    }
    Ok(json!({ "type": task_type.as_str(), "echo": payload["n"] }))
}

#[tokio::test]
async fn test_concurrent_tasks_grow_to_max() {
    let config = PoolConfig::new().with_min_workers(1).with_max_workers(4);
    let pool = Arc::new(WorkerPool::new(config, Arc::new(handler)).unwrap());
    pool.initialize().unwrap();

    let handles: Vec<_> = (0..12)
        .map(|n| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                pool.execute(TaskType::Sheet, json!({ "n": n, "sleepMs": 20 }))
                    .await
            })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert_eq!(value["type"], "2D");
        seen.push(value["echo"].as_u64().unwrap());
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..12).collect::<Vec<u64>>());

    let stats = pool.stats();
    assert!(stats.total_workers >= 1 && stats.total_workers <= 4);
    assert_eq!(stats.pending_tasks, 0);
    assert_eq!(stats.queued_tasks, 0);
    pool.shutdown().await;
}

#[tokio::test]
async fn test_hung_worker_times_out() {
    let config = PoolConfig::new()
        .with_min_workers(1)
        .with_max_workers(2)
        .with_task_timeout(Duration::from_millis(50));
    let pool = WorkerPool::new(config, Arc::new(handler)).unwrap();
    pool.initialize().unwrap();

    let start = Instant::now();
    let result = pool
        .execute(TaskType::Linear, json!({ "n": 1, "sleepMs": 300 }))
        .await;
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(PoolError::Timeout(_))));
    assert!(elapsed < Duration::from_millis(250), "took {:?}", elapsed);
    assert_eq!(pool.stats().total_workers, 1);
    assert!(pool.is_healthy());

    // The abandoned worker finishes later; its result must not leak into
    // the next task.
    tokio::time::sleep(Duration::from_millis(350)).await;
    let value = pool
        .execute(TaskType::Linear, json!({ "n": 2 }))
        .await
        .unwrap();
    assert_eq!(value["echo"], 2);
    assert_eq!(pool.stats().pending_tasks, 0);
    pool.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_twice() {
    let pool = WorkerPool::new(PoolConfig::new(), Arc::new(handler)).unwrap();
    pool.initialize().unwrap();
    pool.shutdown().await;
    pool.shutdown().await;
    assert!(!pool.is_healthy());
}

#[test]
fn test_invalid_config_rejected() {
    let config = PoolConfig::new().with_min_workers(3).with_max_workers(1);
    assert!(matches!(
        WorkerPool::new(config, Arc::new(handler)),
        Err(PoolError::InvalidConfig(_))
    ));
}
