//! Result helpers shared by the 1D and 2D engines.

use crate::piece::{PieceId, UnitPiece};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unplaced demand re-aggregated by origin identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnplacedGroup<S> {
    /// Demand line of the first unit that failed.
    pub id: PieceId,
    /// Origin identity shared by every unit in the group.
    pub origin_id: PieceId,
    /// Size of one unit.
    pub size: S,
    /// Number of units that could not be placed.
    pub quantity: usize,
}

/// Accumulates unplaced units, grouping them by origin identity.
///
/// Groups keep the order in which their first unit failed.
#[derive(Debug, Clone)]
pub struct UnplacedTracker<S> {
    groups: Vec<UnplacedGroup<S>>,
    index: HashMap<PieceId, usize>,
}

impl<S: Copy> UnplacedTracker<S> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Records one unplaced unit.
    pub fn add(&mut self, piece: &UnitPiece<S>) {
        if let Some(&i) = self.index.get(&piece.origin_id) {
            self.groups[i].quantity += 1;
            return;
        }

        self.index.insert(piece.origin_id.clone(), self.groups.len());
        self.groups.push(UnplacedGroup {
            id: piece.line_id.clone(),
            origin_id: piece.origin_id.clone(),
            size: piece.size,
            quantity: 1,
        });
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of unplaced units across all groups.
    pub fn total_quantity(&self) -> usize {
        self.groups.iter().map(|g| g.quantity).sum()
    }

    /// Consumes the tracker and returns the groups.
    pub fn into_groups(self) -> Vec<UnplacedGroup<S>> {
        self.groups
    }
}

impl<S: Copy> Default for UnplacedTracker<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `part / whole` as a percentage, or 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
