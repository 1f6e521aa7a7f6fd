//! Packer trait shared by the cutting engines.

use crate::piece::Demand;
use crate::stock::StockResource;

/// Trait for cutting-stock packers.
///
/// A packer never fails with an error for algorithm-level problems: empty
/// input and unplaceable pieces are reported inside `Output`.
pub trait Packer {
    /// The demand line type this packer consumes.
    type Demand: Demand;
    /// The stock type this packer cuts from.
    type Stock: StockResource;
    /// The plan type this packer produces.
    type Output;

    /// Builds a cutting plan for the demand from the given stock.
    fn pack(&self, demand: &[Self::Demand], stock: &[Self::Stock]) -> Self::Output;

    /// Returns the name of the algorithm, for logging.
    fn name(&self) -> &'static str;
}
