//! Run requests and engine configuration.

use serde::{Deserialize, Serialize};
use u_cutstock_d1::Options1D;
use u_cutstock_d2::Options2D;

/// A request to optimize one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    /// Job whose items are cut.
    pub job_id: String,
    /// Restricts candidate stock to these ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_ids: Option<Vec<String>>,
    /// Options for linear jobs; engine defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_options: Option<Options1D>,
    /// Options for rectangular jobs; engine defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_options: Option<Options2D>,
}

impl OptimizationRequest {
    /// Creates a request with engine-default options.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            stock_ids: None,
            linear_options: None,
            sheet_options: None,
        }
    }

    pub fn with_stock_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.stock_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_linear_options(mut self, options: Options1D) -> Self {
        self.linear_options = Some(options);
        self
    }

    pub fn with_sheet_options(mut self, options: Options2D) -> Self {
        self.sheet_options = Some(options);
        self
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dispatch to the worker pool when one is attached and healthy.
    pub use_pool: bool,
    /// Options for linear requests that carry none.
    pub linear: Options1D,
    /// Options for rectangular requests that carry none.
    pub sheet: Options2D,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_pool: true,
            linear: Options1D::default(),
            sheet: Options2D::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_use_pool(mut self, use_pool: bool) -> Self {
        self.use_pool = use_pool;
        self
    }

    pub fn with_linear(mut self, options: Options1D) -> Self {
        self.linear = options;
        self
    }

    pub fn with_sheet(mut self, options: Options2D) -> Self {
        self.sheet = options;
        self
    }

    /// Options for a linear run of `request`.
    pub fn linear_options(&self, request: &OptimizationRequest) -> Options1D {
        request
            .linear_options
            .clone()
            .unwrap_or_else(|| self.linear.clone())
    }

    /// Options for a rectangular run of `request`.
    pub fn sheet_options(&self, request: &OptimizationRequest) -> Options2D {
        request
            .sheet_options
            .clone()
            .unwrap_or_else(|| self.sheet.clone())
    }
}
