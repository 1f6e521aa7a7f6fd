//! 2D input and output types.
//!
//! Field names follow the camelCase wire format when the `serde` feature is
//! enabled. Areas in statistics and usable-waste thresholds are in square
//! units of the sheet dimensions.

use u_cutstock_core::{
    Demand, Error, GrainDirection, PieceId, Result, StockResource, UnplacedGroup,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width and height of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size2D {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Size2D {
    /// Creates a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `width * height`.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns the size with width and height swapped.
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Returns true if both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A rectangular demand line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Piece2D {
    /// Unique identifier.
    pub id: PieceId,
    /// Width of one piece.
    pub width: f64,
    /// Height of one piece.
    pub height: f64,
    /// Number of pieces requested.
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: usize,
    /// Origin identity for re-aggregation (defaults to `id`).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub origin_id: Option<PieceId>,
    /// Whether the piece may be turned by 90 degrees.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub can_rotate: bool,
    /// Grain direction the piece must keep.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub grain: Option<GrainDirection>,
}

#[cfg(feature = "serde")]
fn default_quantity() -> usize {
    1
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl Piece2D {
    /// Creates a rotatable demand line for one piece.
    pub fn new(id: impl Into<PieceId>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            quantity: 1,
            origin_id: None,
            can_rotate: true,
            grain: None,
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

    /// Sets whether the piece may rotate.
    pub fn with_rotation(mut self, can_rotate: bool) -> Self {
        self.can_rotate = can_rotate;
        self
    }

    /// Sets the grain direction.
    pub fn with_grain(mut self, grain: GrainDirection) -> Self {
        self.grain = Some(grain);
        self
    }
}

impl Demand for Piece2D {
    type Size = Size2D;

    fn id(&self) -> &str {
        &self.id
    }

    fn origin_id(&self) -> &str {
        self.origin_id.as_deref().unwrap_or(&self.id)
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    fn can_rotate(&self) -> bool {
        self.can_rotate
    }

    fn grain(&self) -> Option<GrainDirection> {
        self.grain
    }

    fn validate(&self) -> Result<()> {
        if !self.size().is_valid() {
            return Err(Error::InvalidPiece(format!(
                "piece {} has invalid size {}x{}",
                self.id, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A sheet stock type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Stock2D {
    /// Unique identifier.
    pub id: String,
    /// Sheet width.
    pub width: f64,
    /// Sheet height.
    pub height: f64,
    /// Number of sheets available.
    pub available: usize,
    /// Price of one sheet.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unit_price: Option<f64>,
}

impl Stock2D {
    /// Creates a stock type with one sheet available.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            available: 1,
            unit_price: None,
        }
    }

    /// Sets the number of sheets available.
    pub fn with_available(mut self, available: usize) -> Self {
        self.available = available;
        self
    }

    /// Sets the unit price.
    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Returns the sheet area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl StockResource for Stock2D {
    type Size = Size2D;

    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    fn available(&self) -> usize {
        self.available
    }

    fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    fn validate(&self) -> Result<()> {
        if !self.size().is_valid() {
            return Err(Error::InvalidStock(format!(
                "stock {} has invalid size {}x{}",
                self.id, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// 2D placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Algorithm2D {
    /// Maximal free rectangles.
    #[default]
    MaxRects,
    /// Disjoint free rectangles split by guillotine cuts.
    Guillotine,
    /// Lowest, then left-most, anchor point.
    BottomLeftFill,
}

impl Algorithm2D {
    /// Returns the wire name of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxRects => "MAX_RECTS",
            Self::Guillotine => "GUILLOTINE",
            Self::BottomLeftFill => "BOTTOM_LEFT_FILL",
        }
    }
}

/// Scoring heuristic for free-rectangle placement. Lower scores win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Heuristic {
    /// Best short side fit.
    #[default]
    Bssf,
    /// Best area fit.
    Baf,
    /// Best long side fit.
    Blsf,
    /// Bottom-left.
    Bl,
    /// Contact point.
    Cp,
    /// Weighted blend of BSSF, BAF and BL.
    Best,
}

impl Heuristic {
    /// The five base heuristics in evaluation order.
    pub const BASE: [Heuristic; 5] = [
        Heuristic::Bssf,
        Heuristic::Baf,
        Heuristic::Blsf,
        Heuristic::Bl,
        Heuristic::Cp,
    ];

    /// Returns the wire name of the heuristic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bssf => "BSSF",
            Self::Baf => "BAF",
            Self::Blsf => "BLSF",
            Self::Bl => "BL",
            Self::Cp => "CP",
            Self::Best => "BEST",
        }
    }
}

/// Options for a 2D run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Options2D {
    /// Placement engine.
    pub algorithm: Algorithm2D,
    /// Scoring heuristic for the free-rectangle engines.
    pub heuristic: Heuristic,
    /// Score every base heuristic and keep the lowest.
    pub all_heuristics: bool,
    /// Material consumed by each cut.
    pub kerf: f64,
    /// Minimum leftover area recorded as reusable.
    pub min_usable_waste: f64,
    /// Allow 90 degree rotation of pieces that permit it.
    pub allow_rotation: bool,
    /// Keep pieces with a grain direction in their native orientation.
    pub respect_grain: bool,
}

impl Default for Options2D {
    fn default() -> Self {
        Self {
            algorithm: Algorithm2D::default(),
            heuristic: Heuristic::default(),
            all_heuristics: false,
            kerf: 0.0,
            min_usable_waste: 0.0,
            allow_rotation: true,
            respect_grain: true,
        }
    }
}

impl Options2D {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placement engine.
    pub fn with_algorithm(mut self, algorithm: Algorithm2D) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the scoring heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Enables or disables scoring with every base heuristic.
    pub fn with_all_heuristics(mut self, enabled: bool) -> Self {
        self.all_heuristics = enabled;
        self
    }

    /// Sets the kerf.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Sets the minimum usable waste area.
    pub fn with_min_usable_waste(mut self, min: f64) -> Self {
        self.min_usable_waste = min;
        self
    }

    /// Sets whether pieces may rotate.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Sets whether grain directions are enforced.
    pub fn with_respect_grain(mut self, respect: bool) -> Self {
        self.respect_grain = respect;
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

/// Complete input of a 2D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CuttingRequest2D {
    /// Demand lines.
    pub pieces: Vec<Piece2D>,
    /// Candidate stock.
    pub stock: Vec<Stock2D>,
    /// Run options.
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Options2D,
}

/// A piece placed on a sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Placement2D {
    /// Unit piece identifier.
    pub piece_id: PieceId,
    /// Origin identity of the piece.
    pub origin_id: PieceId,
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Placed width (after rotation).
    pub width: f64,
    /// Placed height (after rotation).
    pub height: f64,
    /// True if width and height were swapped.
    pub rotated: bool,
}

impl Placement2D {
    /// Returns the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the placed area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Reusable leftover rectangle on a sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsableWaste2D {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl UsableWaste2D {
    /// Returns the area of the leftover.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Final record of one sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SheetResult {
    /// Stock type the sheet was taken from.
    pub stock_id: String,
    /// Sheet width.
    pub width: f64,
    /// Sheet height.
    pub height: f64,
    /// Placements in placement order.
    pub placements: Vec<Placement2D>,
    /// Sheet area not covered by pieces, kerf included.
    pub waste: f64,
    /// Waste as a percentage of the sheet area.
    pub waste_percentage: f64,
    /// Largest reusable leftover, when it reaches the configured minimum.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub usable_waste: Option<UsableWaste2D>,
}

impl SheetResult {
    /// Returns the sheet area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns the summed area of all placements.
    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(|p| p.area()).sum()
    }
}

/// Unplaced demand, grouped by origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnplacedPiece2D {
    /// Demand line of the first unit that failed.
    pub id: PieceId,
    /// Width of one piece.
    pub width: f64,
    /// Height of one piece.
    pub height: f64,
    /// Number of units that could not be placed.
    pub quantity: usize,
    /// Origin identity.
    pub origin_id: PieceId,
}

impl From<UnplacedGroup<Size2D>> for UnplacedPiece2D {
    fn from(group: UnplacedGroup<Size2D>) -> Self {
        Self {
            id: group.id,
            width: group.size.width,
            height: group.size.height,
            quantity: group.quantity,
            origin_id: group.origin_id,
        }
    }
}

/// Aggregate statistics of a 2D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Statistics2D {
    /// Number of unit pieces requested.
    pub total_pieces: usize,
    /// Summed area of all sheets used.
    pub total_stock_area: f64,
    /// Summed area of all placed pieces.
    pub total_used_area: f64,
    /// Used area as a percentage of stock area.
    pub efficiency: f64,
    /// Summed unit price of all sheets used.
    pub total_cost: f64,
}

/// Output of a 2D run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CuttingPlan2D {
    /// True when every piece was placed.
    pub success: bool,
    /// Failure description.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<String>,
    /// Sheets in opening order.
    pub sheets: Vec<SheetResult>,
    /// Summed waste area of all sheets.
    pub total_waste: f64,
    /// Total waste as a percentage of total stock area.
    pub total_waste_percentage: f64,
    /// Number of sheets used.
    pub stock_used_count: usize,
    /// Pieces that fit no sheet.
    pub unplaced_pieces: Vec<UnplacedPiece2D>,
    /// Aggregate statistics.
    pub statistics: Statistics2D,
}

impl CuttingPlan2D {
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
