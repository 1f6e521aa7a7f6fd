//! Job files for the `plan` command.

use serde::{Deserialize, Serialize};
use u_cutstock::d1::Options1D;
use u_cutstock::d2::Options2D;
use u_cutstock::{InMemoryJobs, InMemoryStock, JobItem, OptimizationRequest, StockItem};

/// A job with its items, the stock on hand and run parameters.
///
/// ```json
/// {
///   "jobId": "frame-12",
///   "items": [{ "id": "rail", "geometry": "LINEAR", "length": 1200, "quantity": 4 }],
///   "stock": [{ "id": "bar-6m", "kind": "BAR", "length": 6000, "available": 3 }],
///   "linearOptions": { "algorithm": "FFD", "kerf": 3 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    #[serde(default = "default_job_id")]
    pub job_id: String,
    pub items: Vec<JobItem>,
    pub stock: Vec<StockItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_options: Option<Options1D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_options: Option<Options2D>,
}

fn default_job_id() -> String {
    "job".to_string()
}

impl PlanFile {
    pub fn request(&self) -> OptimizationRequest {
        OptimizationRequest {
            job_id: self.job_id.clone(),
            stock_ids: self.stock_ids.clone(),
            linear_options: self.linear_options.clone(),
            sheet_options: self.sheet_options.clone(),
        }
    }

    /// Serves the file's job and stock through the in-memory lookups.
    pub fn into_lookups(self) -> (InMemoryJobs, InMemoryStock) {
        let jobs = InMemoryJobs::new().with_job(self.job_id, self.items);
        (jobs, InMemoryStock::new(self.stock))
    }
}
