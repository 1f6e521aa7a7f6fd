//! Packing work run inside pool workers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use u_cutstock_d1::CuttingRequest1D;
use u_cutstock_d2::CuttingRequest2D;
use u_cutstock_worker::{PoolConfig, TaskHandler, TaskType, WorkerPool};

/// Runs 1D and 2D cutting requests carried as task payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackingTaskHandler;

impl TaskHandler for PackingTaskHandler {
    fn handle(&self, task_type: TaskType, payload: Value) -> Result<Value, String> {
        match task_type {
            TaskType::Linear => run::<CuttingRequest1D, _>(payload, u_cutstock_d1::solve_request),
            TaskType::Sheet => run::<CuttingRequest2D, _>(payload, u_cutstock_d2::solve_request),
        }
    }
}

fn run<R, P>(payload: Value, solve: fn(&R) -> P) -> Result<Value, String>
where
    R: DeserializeOwned,
    P: Serialize,
{
    let request: R =
        serde_json::from_value(payload).map_err(|e| format!("invalid task payload: {}", e))?;
    serde_json::to_value(solve(&request)).map_err(|e| format!("unencodable plan: {}", e))
}

/// Creates a pool whose workers run [`PackingTaskHandler`].
pub fn packing_pool(config: PoolConfig) -> u_cutstock_worker::Result<WorkerPool> {
    WorkerPool::new(config, Arc::new(PackingTaskHandler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linear_task() {
        let payload = json!({
            "pieces": [{ "id": "A", "length": 1000, "quantity": 2 }],
            "stock": [{ "id": "S", "length": 2400, "available": 1 }],
            "options": { "algorithm": "FFD", "kerf": 3, "minUsableWaste": 100 }
        });
        let value = PackingTaskHandler.handle(TaskType::Linear, payload).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["bars"][0]["cuts"][1]["position"], 1003.0);
    }

    #[test]
    fn test_sheet_task() {
        let payload = json!({
            "pieces": [{ "id": "P", "width": 600, "height": 400 }],
            "stock": [{ "id": "S", "width": 1200, "height": 2400, "available": 1 }]
        });
        let value = PackingTaskHandler.handle(TaskType::Sheet, payload).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["sheets"][0]["placements"][0]["pieceId"], "P#1");
    }

    #[test]
    fn test_malformed_payload() {
        let error = PackingTaskHandler
            .handle(TaskType::Linear, json!({ "pieces": "none" }))
            .unwrap_err();
        assert!(error.starts_with("invalid task payload"));
    }
}
