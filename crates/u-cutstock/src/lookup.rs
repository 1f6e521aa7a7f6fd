//! Job and stock lookup collaborators.
//!
//! The engine reads job items and candidate stock through two narrow,
//! read-only traits. Storage belongs to the caller; [`InMemoryJobs`] and
//! [`InMemoryStock`] serve fixed data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;
use u_cutstock_core::{GrainDirection, EPSILON};

/// Shape family of a job item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Geometry {
    /// Cut from bars; needs a length.
    Linear,
    /// Cut from sheets; needs a width and a height.
    Rectangular,
}

impl Geometry {
    /// Stock kind that items of this geometry are cut from.
    pub fn stock_kind(&self) -> StockKind {
        match self {
            Self::Linear => StockKind::Bar,
            Self::Rectangular => StockKind::Sheet,
        }
    }
}

/// Kind of stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockKind {
    Bar,
    Sheet,
}

/// One line of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobItem {
    pub id: String,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain: Option<GrainDirection>,
}

fn default_quantity() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl JobItem {
    /// Creates a linear item.
    pub fn linear(id: impl Into<String>, length: f64) -> Self {
        Self::blank(id.into(), Geometry::Linear).with_length(length)
    }

    /// Creates a rectangular item.
    pub fn rectangular(id: impl Into<String>, width: f64, height: f64) -> Self {
        let mut item = Self::blank(id.into(), Geometry::Rectangular);
        item.width = Some(width);
        item.height = Some(height);
        item
    }

    fn blank(id: String, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            length: None,
            width: None,
            height: None,
            quantity: 1,
            material: None,
            thickness: None,
            can_rotate: true,
            grain: None,
        }
    }

    fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_rotation(mut self, can_rotate: bool) -> Self {
        self.can_rotate = can_rotate;
        self
    }

    pub fn with_grain(mut self, grain: GrainDirection) -> Self {
        self.grain = Some(grain);
        self
    }
}

/// A stock item offered for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: String,
    pub kind: StockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Units on hand.
    #[serde(default = "default_quantity")]
    pub available: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl StockItem {
    /// Creates a bar of the given length.
    pub fn bar(id: impl Into<String>, length: f64) -> Self {
        let mut item = Self::blank(id.into(), StockKind::Bar);
        item.length = Some(length);
        item
    }

    /// Creates a sheet of the given size.
    pub fn sheet(id: impl Into<String>, width: f64, height: f64) -> Self {
        let mut item = Self::blank(id.into(), StockKind::Sheet);
        item.width = Some(width);
        item.height = Some(height);
        item
    }

    fn blank(id: String, kind: StockKind) -> Self {
        Self {
            id,
            kind,
            length: None,
            width: None,
            height: None,
            material: None,
            thickness: None,
            available: 1,
            unit_price: None,
        }
    }

    pub fn with_available(mut self, available: usize) -> Self {
        self.available = available;
        self
    }

    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }
}

/// Stock filter built from the first job item and the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    pub kind: StockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Explicit allow-list of stock ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
}

impl StockQuery {
    /// Returns true if the item satisfies every constraint of the query.
    ///
    /// Unset material or thickness constraints match anything.
    pub fn matches(&self, item: &StockItem) -> bool {
        if item.kind != self.kind {
            return false;
        }
        if let Some(material) = &self.material {
            if item.material.as_ref() != Some(material) {
                return false;
            }
        }
        if let Some(thickness) = self.thickness {
            match item.thickness {
                Some(t) if (t - thickness).abs() <= EPSILON => {}
                _ => return false,
            }
        }
        match &self.ids {
            Some(ids) => ids.iter().any(|id| *id == item.id),
            None => true,
        }
    }
}

/// Lookup failure.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("job {0} not found")]
    JobNotFound(String),

    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to job items.
pub trait JobLookup: Send + Sync {
    /// Returns the items of a job in job order.
    fn job_items(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<Vec<JobItem>, LookupError>> + Send;
}

/// Read-only access to candidate stock.
pub trait StockLookup: Send + Sync {
    /// Returns the stock items matching the query, in a stable order.
    fn find_stock(
        &self,
        query: &StockQuery,
    ) -> impl Future<Output = Result<Vec<StockItem>, LookupError>> + Send;
}

/// Jobs held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobs {
    jobs: HashMap<String, Vec<JobItem>>,
}

impl InMemoryJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a job.
    pub fn with_job(mut self, job_id: impl Into<String>, items: Vec<JobItem>) -> Self {
        self.insert(job_id, items);
        self
    }

    /// Adds or replaces a job.
    pub fn insert(&mut self, job_id: impl Into<String>, items: Vec<JobItem>) {
        self.jobs.insert(job_id.into(), items);
    }
}

impl JobLookup for InMemoryJobs {
    async fn job_items(&self, job_id: &str) -> Result<Vec<JobItem>, LookupError> {
        self.jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| LookupError::JobNotFound(job_id.to_string()))
    }
}

/// Stock held in memory, returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStock {
    items: Vec<StockItem>,
}

impl InMemoryStock {
    pub fn new(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: StockItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }
}

impl StockLookup for InMemoryStock {
    async fn find_stock(&self, query: &StockQuery) -> Result<Vec<StockItem>, LookupError> {
        Ok(self
            .items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect())
    }
}
