//! Demand lines and the unit pieces they expand into.

use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a demand line or unit piece.
pub type PieceId = String;

/// Direction of the material grain a piece must follow.
///
/// A piece with a grain direction keeps its native orientation whenever the
/// run enforces grain constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum GrainDirection {
    /// Grain runs along the piece width.
    Horizontal,
    /// Grain runs along the piece height.
    Vertical,
}

/// A demand line: one shape requested in some integer quantity.
pub trait Demand {
    /// Size of one unit (a length in 1D, a width/height pair in 2D).
    type Size: Copy;

    /// Returns the identifier of this demand line.
    fn id(&self) -> &str;

    /// Returns the origin identity used to re-aggregate unplaced pieces.
    fn origin_id(&self) -> &str;

    /// Returns the number of units requested.
    fn quantity(&self) -> usize;

    /// Returns the size of one unit.
    fn size(&self) -> Self::Size;

    /// Returns whether a unit may be rotated.
    fn can_rotate(&self) -> bool {
        false
    }

    /// Returns the grain constraint, if any.
    fn grain(&self) -> Option<GrainDirection> {
        None
    }

    /// Validates the demand line and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// A single unit of demand, produced by [`crate::expand`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitPiece<S> {
    /// Unique identifier of this unit (`"{line}#{n}"`).
    pub id: PieceId,
    /// Identifier of the demand line that produced this unit.
    pub line_id: PieceId,
    /// Origin identity for re-aggregation.
    pub origin_id: PieceId,
    /// Size of the unit.
    pub size: S,
    /// Whether the unit may be rotated.
    pub can_rotate: bool,
    /// Grain constraint.
    pub grain: Option<GrainDirection>,
    /// Position in expansion order; used as the stable tie-breaker.
    pub sequence: usize,
}

impl<S> UnitPiece<S> {
    /// Returns true if the unit carries a grain constraint.
    pub fn has_grain(&self) -> bool {
        self.grain.is_some()
    }
}
