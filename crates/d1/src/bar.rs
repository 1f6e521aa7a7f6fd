//! Open bar bookkeeping.

use crate::types::{BarResult, Cut, Stock1D, UsableWaste1D};
use u_cutstock_core::{percentage, UnitPiece, EPSILON};

/// A bar opened during a run.
///
/// Cuts are laid out from offset 0 with one kerf between neighbours, so the
/// remaining length always equals the bar length minus pieces and kerfs.
#[derive(Debug, Clone)]
pub struct ActiveBar {
    stock_index: usize,
    stock_id: String,
    length: f64,
    remaining: f64,
    unit_price: Option<f64>,
    cuts: Vec<Cut>,
}

impl ActiveBar {
    /// Opens a bar of the given stock type.
    pub fn new(stock_index: usize, stock: &Stock1D) -> Self {
        Self {
            stock_index,
            stock_id: stock.id.clone(),
            length: stock.length,
            remaining: stock.length,
            unit_price: stock.unit_price,
            cuts: Vec::new(),
        }
    }

    /// Returns the index of the stock type this bar came from.
    pub fn stock_index(&self) -> usize {
        self.stock_index
    }

    /// Returns the bar length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the length still available.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Returns the cuts made so far.
    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    /// Returns the unit price of the bar, if known.
    pub fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    /// Length a piece consumes on this bar, including the separating kerf.
    pub fn required(&self, piece_length: f64, kerf: f64) -> f64 {
        if self.cuts.is_empty() {
            piece_length
        } else {
            piece_length + kerf
        }
    }

    /// Returns true if a piece of the given length still fits.
    pub fn fits(&self, piece_length: f64, kerf: f64) -> bool {
        self.required(piece_length, kerf) <= self.remaining + EPSILON
    }

    /// Remaining length after cutting a piece of the given length.
    pub fn leftover_after(&self, piece_length: f64, kerf: f64) -> f64 {
        self.remaining - self.required(piece_length, kerf)
    }

    /// Cuts a piece from the bar. The caller checks [`Self::fits`] first.
    pub fn cut(&mut self, piece: &UnitPiece<f64>, kerf: f64) {
        let position = match self.cuts.last() {
            Some(last) => last.end() + kerf,
            None => 0.0,
        };

        self.remaining -= self.required(piece.size, kerf);
        // Absorb rounding so an exact fit leaves zero, not -1e-13.
        if self.remaining.abs() < EPSILON {
            self.remaining = 0.0;
        }

        self.cuts.push(Cut {
            piece_id: piece.id.clone(),
            origin_id: piece.origin_id.clone(),
            position,
            length: piece.size,
        });
    }

    /// Summed length of all pieces on the bar.
    pub fn used_length(&self) -> f64 {
        self.cuts.iter().map(|c| c.length).sum()
    }

    /// Material consumed by kerfs between cuts.
    pub fn kerf_consumed(&self, kerf: f64) -> f64 {
        kerf * self.cuts.len().saturating_sub(1) as f64
    }

    /// Length not covered by pieces or kerfs.
    pub fn waste(&self, kerf: f64) -> f64 {
        self.length - self.used_length() - self.kerf_consumed(kerf)
    }

    /// Converts the bar into its final record.
    ///
    /// The remnant starts one kerf after the last cut, so its recorded length
    /// is the waste minus that kerf.
    pub fn into_result(self, kerf: f64, min_usable_waste: f64) -> BarResult {
        let waste = self.waste(kerf);

        let usable_waste = match self.cuts.last() {
            Some(last) if waste > EPSILON && waste + EPSILON >= min_usable_waste => {
                let position = last.end() + kerf;
                let length = self.length - position;
                (length > EPSILON).then_some(UsableWaste1D { position, length })
            }
            _ => None,
        };

        BarResult {
            waste_percentage: percentage(waste, self.length),
            stock_id: self.stock_id,
            stock_length: self.length,
            cuts: self.cuts,
            waste,
            usable_waste,
        }
    }
}
