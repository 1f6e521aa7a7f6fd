//! Engine output.
//!
//! A [`Plan`] summarizes a 1D or 2D cutting plan in a shape common to both;
//! each container becomes a [`Layout`] whose payload is the serialized bar or
//! sheet record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use u_cutstock_d1::CuttingPlan1D;
use u_cutstock_d2::CuttingPlan2D;

/// One used stock unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub stock_item_id: String,
    /// 1-based position in opening order.
    pub sequence: usize,
    pub waste: f64,
    pub waste_percentage: f64,
    /// The bar or sheet record with its cuts or placements.
    pub layout_payload: Value,
}

/// Summary of a cutting plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub total_waste: f64,
    pub waste_percentage: f64,
    pub stock_used_count: usize,
    pub efficiency: f64,
    pub total_cost: f64,
    pub layouts: Vec<Layout>,
    pub unplaced_count: usize,
}

/// Result of [`crate::OptimizationEngine::run_optimization`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OptimizationOutcome {
    /// Failure without a plan.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            plan: None,
            error: Some(error.into()),
        }
    }

    /// Summarizes a bar-cutting plan.
    pub fn from_linear(plan: &CuttingPlan1D) -> serde_json::Result<Self> {
        let layouts = plan
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Ok(Layout {
                    stock_item_id: bar.stock_id.clone(),
                    sequence: i + 1,
                    waste: bar.waste,
                    waste_percentage: bar.waste_percentage,
                    layout_payload: serde_json::to_value(bar)?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self {
            success: plan.success,
            error: plan.error.clone(),
            plan: Some(Plan {
                total_waste: plan.total_waste,
                waste_percentage: plan.total_waste_percentage,
                stock_used_count: plan.stock_used_count,
                efficiency: plan.statistics.efficiency,
                total_cost: plan.statistics.total_cost,
                layouts,
                unplaced_count: plan.unplaced_count(),
            }),
        })
    }

    /// Summarizes a sheet-nesting plan.
    pub fn from_sheets(plan: &CuttingPlan2D) -> serde_json::Result<Self> {
        let layouts = plan
            .sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| {
                Ok(Layout {
                    stock_item_id: sheet.stock_id.clone(),
                    sequence: i + 1,
                    waste: sheet.waste,
                    waste_percentage: sheet.waste_percentage,
                    layout_payload: serde_json::to_value(sheet)?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self {
            success: plan.success,
            error: plan.error.clone(),
            plan: Some(Plan {
                total_waste: plan.total_waste,
                waste_percentage: plan.total_waste_percentage,
                stock_used_count: plan.stock_used_count,
                efficiency: plan.statistics.efficiency,
                total_cost: plan.statistics.total_cost,
                layouts,
                unplaced_count: plan.unplaced_count(),
            }),
        })
    }
}
