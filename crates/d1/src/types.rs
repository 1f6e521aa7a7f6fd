//! 1D input and output types.
//!
//! With the `serde` feature these types serialize to the camelCase wire format
//! exchanged with cutting workers.

use u_cutstock_core::{Demand, Error, PieceId, Result, StockResource, UnplacedGroup};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A linear demand line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Piece1D {
    /// Unique identifier.
    pub id: PieceId,
    /// Length of one piece.
    pub length: f64,
    /// Number of pieces requested.
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: usize,
    /// Origin identity for re-aggregation (defaults to `id`).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub origin_id: Option<PieceId>,
    /// Accepted for symmetry with 2D demand; has no effect on a bar.
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_rotate: bool,
}

#[cfg(feature = "serde")]
fn default_quantity() -> usize {
    1
}

impl Piece1D {
    /// Creates a demand line for one piece of the given length.
    pub fn new(id: impl Into<PieceId>, length: f64) -> Self {
        Self {
            id: id.into(),
            length,
            quantity: 1,
            origin_id: None,
            can_rotate: false,
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the origin identity.
    pub fn with_origin(mut self, origin_id: impl Into<PieceId>) -> Self {
        self.origin_id = Some(origin_id.into());
        self
    }
}

impl Demand for Piece1D {
    type Size = f64;

    fn id(&self) -> &str {
        &self.id
    }

    fn origin_id(&self) -> &str {
        self.origin_id.as_deref().unwrap_or(&self.id)
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn size(&self) -> f64 {
        self.length
    }

    fn can_rotate(&self) -> bool {
        self.can_rotate
    }

    fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(Error::InvalidPiece(format!(
                "piece {} has invalid length {}",
                self.id, self.length
            )));
        }
        Ok(())
    }
}

/// A bar stock type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Stock1D {
    /// Unique identifier.
    pub id: String,
    /// Length of one bar.
    pub length: f64,
    /// Number of bars available.
    pub available: usize,
    /// Price of one bar.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unit_price: Option<f64>,
}

impl Stock1D {
    /// Creates a stock type with one bar available.
    pub fn new(id: impl Into<String>, length: f64) -> Self {
        Self {
            id: id.into(),
            length,
            available: 1,
            unit_price: None,
        }
    }

    /// Sets the number of bars available.
    pub fn with_available(mut self, available: usize) -> Self {
        self.available = available;
        self
    }

    /// Sets the unit price.
    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }
}

impl StockResource for Stock1D {
    type Size = f64;

    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> f64 {
        self.length
    }

    fn available(&self) -> usize {
        self.available
    }

    fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(Error::InvalidStock(format!(
                "stock {} has invalid length {}",
                self.id, self.length
            )));
        }
        Ok(())
    }
}

/// 1D packing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm1D {
    /// First-Fit Decreasing.
    #[cfg_attr(feature = "serde", serde(rename = "FFD"))]
    Ffd,
    /// Best-Fit Decreasing.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "BFD"))]
    Bfd,
    /// Accepted for compatibility; runs Best-Fit Decreasing.
    #[cfg_attr(feature = "serde", serde(rename = "BRANCH_AND_BOUND"))]
    BranchAndBound,
}

impl Algorithm1D {
    /// Returns the wire name of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ffd => "FFD",
            Self::Bfd => "BFD",
            Self::BranchAndBound => "BRANCH_AND_BOUND",
        }
    }
}

/// Options for a 1D run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Options1D {
    /// Packing algorithm.
    pub algorithm: Algorithm1D,
    /// Material consumed between adjacent cuts.
    pub kerf: f64,
    /// Minimum leftover length recorded as reusable.
    pub min_usable_waste: f64,
}

impl Default for Options1D {
    fn default() -> Self {
        Self {
            algorithm: Algorithm1D::default(),
            kerf: 0.0,
            min_usable_waste: 0.0,
        }
    }
}

impl Options1D {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm1D) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the kerf.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Sets the minimum usable waste length.
    pub fn with_min_usable_waste(mut self, min: f64) -> Self {
        self.min_usable_waste = min;
        self
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<()> {
        if !self.kerf.is_finite() || self.kerf < 0.0 {
            return Err(Error::ConfigError(format!("invalid kerf {}", self.kerf)));
        }
        if !self.min_usable_waste.is_finite() || self.min_usable_waste < 0.0 {
            return Err(Error::ConfigError(format!(
                "invalid minimum usable waste {}",
                self.min_usable_waste
            )));
        }
        Ok(())
    }
}

/// Complete input of a 1D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CuttingRequest1D {
    /// Demand lines.
    pub pieces: Vec<Piece1D>,
    /// Candidate stock.
    pub stock: Vec<Stock1D>,
    /// Run options.
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Options1D,
}

/// A single cut on a bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Cut {
    /// Unit piece identifier.
    pub piece_id: PieceId,
    /// Origin identity of the piece.
    pub origin_id: PieceId,
    /// Offset of the cut from the start of the bar.
    pub position: f64,
    /// Length of the piece.
    pub length: f64,
}

impl Cut {
    /// Returns the offset where this cut ends.
    pub fn end(&self) -> f64 {
        self.position + self.length
    }
}

/// Reusable leftover at the end of a bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UsableWaste1D {
    /// Offset where the remnant starts.
    pub position: f64,
    /// Length of the remnant.
    pub length: f64,
}

/// Final record of one bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BarResult {
    /// Stock type the bar was taken from.
    pub stock_id: String,
    /// Length of the bar.
    pub stock_length: f64,
    /// Cuts in placement order.
    pub cuts: Vec<Cut>,
    /// Length not covered by pieces or kerf.
    pub waste: f64,
    /// Waste as a percentage of the bar length.
    pub waste_percentage: f64,
    /// Reusable leftover, when the waste reaches the configured minimum.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub usable_waste: Option<UsableWaste1D>,
}

impl BarResult {
    /// Returns the summed length of all cut pieces.
    pub fn used_length(&self) -> f64 {
        self.cuts.iter().map(|c| c.length).sum()
    }
}

/// Unplaced demand, grouped by origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnplacedPiece1D {
    /// Demand line of the first unit that failed.
    pub id: PieceId,
    /// Length of one piece.
    pub length: f64,
    /// Number of units that could not be placed.
    pub quantity: usize,
    /// Origin identity.
    pub origin_id: PieceId,
}

impl From<UnplacedGroup<f64>> for UnplacedPiece1D {
    fn from(group: UnplacedGroup<f64>) -> Self {
        Self {
            id: group.id,
            length: group.size,
            quantity: group.quantity,
            origin_id: group.origin_id,
        }
    }
}

/// Aggregate statistics of a 1D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Statistics1D {
    /// Number of unit pieces requested.
    pub total_pieces: usize,
    /// Summed length of all bars used.
    pub total_stock_length: f64,
    /// Summed length of all placed pieces.
    pub total_used_length: f64,
    /// Used length as a percentage of stock length.
    pub efficiency: f64,
    /// Summed unit price of all bars used.
    pub total_cost: f64,
}

/// Output of a 1D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CuttingPlan1D {
    /// True when every piece was placed.
    pub success: bool,
    /// Failure description.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<String>,
    /// Bars in opening order.
    pub bars: Vec<BarResult>,
    /// Summed waste of all bars.
    pub total_waste: f64,
    /// Total waste as a percentage of total stock length.
    pub total_waste_percentage: f64,
    /// Number of bars used.
    pub stock_used_count: usize,
    /// Pieces that fit no bar.
    pub unplaced_pieces: Vec<UnplacedPiece1D>,
    /// Aggregate statistics.
    pub statistics: Statistics1D,
}

impl CuttingPlan1D {
    /// Creates an empty, unsuccessful plan carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Returns the number of unplaced units.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced_pieces.iter().map(|u| u.quantity).sum()
    }
}
