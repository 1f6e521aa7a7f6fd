//! Open sheet bookkeeping.

use crate::blf;
use crate::free_rect::{FreeRect, FreeRectangles};
use crate::heuristic::{find_candidate, Candidate, Orientation};
use crate::types::{
    Algorithm2D, Options2D, Placement2D, SheetResult, Size2D, Stock2D, UsableWaste2D,
};
use u_cutstock_core::{percentage, UnitPiece, EPSILON};

/// A sheet opened during a run.
///
/// The free-rectangle engines keep `free` in sync with `placements`;
/// bottom-left fill works from the placements alone.
#[derive(Debug, Clone)]
pub struct ActiveSheet {
    stock_index: usize,
    stock_id: String,
    size: Size2D,
    unit_price: Option<f64>,
    algorithm: Algorithm2D,
    free: FreeRectangles,
    placements: Vec<Placement2D>,
    used_area: f64,
}

impl ActiveSheet {
    /// Opens a sheet of the given stock type.
    pub fn new(stock_index: usize, stock: &Stock2D, algorithm: Algorithm2D) -> Self {
        Self {
            stock_index,
            stock_id: stock.id.clone(),
            size: Size2D::new(stock.width, stock.height),
            unit_price: stock.unit_price,
            algorithm,
            free: FreeRectangles::new(stock.width, stock.height),
            placements: Vec::new(),
            used_area: 0.0,
        }
    }

    pub fn stock_index(&self) -> usize {
        self.stock_index
    }

    pub fn size(&self) -> Size2D {
        self.size
    }

    pub fn area(&self) -> f64 {
        self.size.area()
    }

    pub fn used_area(&self) -> f64 {
        self.used_area
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    pub fn placements(&self) -> &[Placement2D] {
        &self.placements
    }

    pub fn free_rects(&self) -> &FreeRectangles {
        &self.free
    }

    /// Best position for a piece on this sheet, if it fits anywhere.
    pub fn find(&self, orientations: &[Orientation], options: &Options2D) -> Option<Candidate> {
        match self.algorithm {
            Algorithm2D::BottomLeftFill => {
                blf::find_position(&self.placements, orientations, self.size, options.kerf)
            }
            Algorithm2D::MaxRects | Algorithm2D::Guillotine => {
                find_candidate(&self.free, orientations, options, self.size)
            }
        }
    }

    /// Commits a piece at a candidate found by [`Self::find`] on this sheet.
    pub fn place(&mut self, piece: &UnitPiece<Size2D>, candidate: &Candidate, kerf: f64) {
        match self.algorithm {
            Algorithm2D::MaxRects => self.free.place_maximal(&candidate.rect(), kerf),
            Algorithm2D::Guillotine => {
                if !self.free.place_guillotine(
                    candidate.rect_index,
                    candidate.width,
                    candidate.height,
                    kerf,
                ) {
                    log::warn!(
                        "free rectangle {} vanished on sheet {}",
                        candidate.rect_index,
                        self.stock_id
                    );
                }
            }
            Algorithm2D::BottomLeftFill => {}
        }

        self.used_area += candidate.area();
        self.placements.push(Placement2D {
            piece_id: piece.id.clone(),
            origin_id: piece.origin_id.clone(),
            x: candidate.x,
            y: candidate.y,
            width: candidate.width,
            height: candidate.height,
            rotated: candidate.rotated,
        });
    }

    /// Largest reusable leftover on the sheet.
    fn leftover(&self, kerf: f64) -> Option<FreeRect> {
        match self.algorithm {
            Algorithm2D::BottomLeftFill => blf::top_strip(&self.placements, self.size, kerf),
            Algorithm2D::MaxRects | Algorithm2D::Guillotine => self.free.largest(),
        }
    }

    /// Converts the sheet into its final record.
    pub fn into_result(self, kerf: f64, min_usable_waste: f64) -> SheetResult {
        let area = self.area();
        let waste = area - self.used_area;

        let usable_waste = self
            .leftover(kerf)
            .filter(|r| waste > EPSILON && r.area() > EPSILON && r.area() + EPSILON >= min_usable_waste)
            .map(|r| UsableWaste2D {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
            });

        SheetResult {
            stock_id: self.stock_id,
            width: self.size.width,
            height: self.size.height,
            placements: self.placements,
            waste,
            waste_percentage: percentage(waste, area),
            usable_waste,
        }
    }
}
