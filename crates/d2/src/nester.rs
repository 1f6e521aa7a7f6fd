//! 2D sheet-nesting solver.

use crate::heuristic::orientations;
use crate::selector::{select_sheet, select_stock};
use crate::sheet::ActiveSheet;
use crate::types::{
    CuttingPlan2D, CuttingRequest2D, Options2D, Piece2D, SheetResult, Size2D, Statistics2D,
    Stock2D, UnplacedPiece2D,
};
use u_cutstock_core::{
    expand, percentage, sort_descending_by, Packer, Result, StockLedger, StockResource,
    UnitPiece, UnplacedTracker,
};

use std::time::Instant;

/// 2D sheet-nesting solver.
///
/// Pieces are placed largest area first. Each piece goes to the open sheet
/// chosen by [`select_sheet`]; a new sheet is opened only when no open sheet
/// has room.
#[derive(Debug, Clone, Default)]
pub struct Nester2D {
    options: Options2D,
}

impl Nester2D {
    /// Creates a nester with the given options.
    pub fn new(options: Options2D) -> Self {
        Self { options }
    }

    /// Creates a nester with default options.
    pub fn default_config() -> Self {
        Self::new(Options2D::default())
    }

    /// Returns the options.
    pub fn options(&self) -> &Options2D {
        &self.options
    }

    /// Builds a cutting plan. Failures are reported through `success` and
    /// `error`.
    pub fn solve(&self, pieces: &[Piece2D], stock: &[Stock2D]) -> CuttingPlan2D {
        if pieces.is_empty() || stock.is_empty() {
            return CuttingPlan2D::failure("No pieces or stock provided");
        }

        match self.run(pieces, stock) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("2D run rejected: {}", e);
                CuttingPlan2D::failure(e.to_string())
            }
        }
    }

    fn run(&self, pieces: &[Piece2D], stock: &[Stock2D]) -> Result<CuttingPlan2D> {
        let start = Instant::now();
        self.options.validate()?;
        for s in stock {
            s.validate()?;
        }

        let mut units = expand(pieces)?;
        if units.is_empty() {
            return Ok(CuttingPlan2D::failure("No pieces or stock provided"));
        }
        sort_descending_by(&mut units, |p| p.size.area());

        let mut ledger = StockLedger::new(stock);
        let mut sheets: Vec<ActiveSheet> = Vec::new();
        let mut unplaced = UnplacedTracker::new();

        for piece in &units {
            if !self.place(piece, stock, &mut ledger, &mut sheets) {
                log::debug!(
                    "piece {} ({}x{}) fits no sheet",
                    piece.id,
                    piece.size.width,
                    piece.size.height
                );
                unplaced.add(piece);
            }
        }

        let plan = self.finish(sheets, unplaced, units.len());
        log::info!(
            "{}/{} placed {} pieces on {} sheets in {}ms, efficiency {:.1}%",
            self.options.algorithm.as_str(),
            self.heuristic_label(),
            units.len() - plan.unplaced_count(),
            plan.stock_used_count,
            start.elapsed().as_millis(),
            plan.statistics.efficiency
        );
        Ok(plan)
    }

    fn heuristic_label(&self) -> &'static str {
        if self.options.all_heuristics {
            "ALL"
        } else {
            self.options.heuristic.as_str()
        }
    }

    /// Places one piece on an open or new sheet. Returns false if it fits
    /// nowhere.
    fn place(
        &self,
        piece: &UnitPiece<Size2D>,
        stock: &[Stock2D],
        ledger: &mut StockLedger,
        sheets: &mut Vec<ActiveSheet>,
    ) -> bool {
        let options = &self.options;
        let allowed = orientations(piece, options);

        if let Some((index, candidate)) = select_sheet(sheets, &allowed, options) {
            sheets[index].place(piece, &candidate, options.kerf);
            return true;
        }

        let Some(stock_index) = select_stock(stock, ledger, &allowed) else {
            return false;
        };
        let mut sheet = ActiveSheet::new(stock_index, &stock[stock_index], options.algorithm);
        let Some(candidate) = sheet.find(&allowed, options) else {
            return false;
        };
        if !ledger.take(stock_index) {
            return false;
        }

        sheet.place(piece, &candidate, options.kerf);
        sheets.push(sheet);
        true
    }

    fn finish(
        &self,
        sheets: Vec<ActiveSheet>,
        unplaced: UnplacedTracker<Size2D>,
        total_pieces: usize,
    ) -> CuttingPlan2D {
        let total_cost: f64 = sheets.iter().filter_map(|s| s.unit_price()).sum();
        let results: Vec<SheetResult> = sheets
            .into_iter()
            .map(|s| s.into_result(self.options.kerf, self.options.min_usable_waste))
            .collect();

        let total_stock_area: f64 = results.iter().map(|s| s.area()).sum();
        let total_used_area: f64 = results.iter().map(|s| s.used_area()).sum();
        let total_waste: f64 = results.iter().map(|s| s.waste).sum();

        let unplaced_count = unplaced.total_quantity();
        let unplaced_pieces: Vec<UnplacedPiece2D> =
            unplaced.into_groups().into_iter().map(Into::into).collect();

        let success = unplaced_pieces.is_empty() && !results.is_empty();
        let error = (!unplaced_pieces.is_empty())
            .then(|| format!("{} piece(s) could not be placed", unplaced_count));

        CuttingPlan2D {
            success,
            error,
            stock_used_count: results.len(),
            total_waste,
            total_waste_percentage: percentage(total_waste, total_stock_area),
            sheets: results,
            unplaced_pieces,
            statistics: Statistics2D {
                total_pieces,
                total_stock_area,
                total_used_area,
                efficiency: percentage(total_used_area, total_stock_area),
                total_cost,
            },
        }
    }
}

impl Packer for Nester2D {
    type Demand = Piece2D;
    type Stock = Stock2D;
    type Output = CuttingPlan2D;

    fn pack(&self, demand: &[Piece2D], stock: &[Stock2D]) -> CuttingPlan2D {
        self.solve(demand, stock)
    }

    fn name(&self) -> &'static str {
        self.options.algorithm.as_str()
    }
}

/// Runs a complete 2D request.
pub fn solve_request(request: &CuttingRequest2D) -> CuttingPlan2D {
    Nester2D::new(request.options.clone()).solve(&request.pieces, &request.stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Algorithm2D, Heuristic};
    use u_cutstock_core::GrainDirection;

    fn nester(algorithm: Algorithm2D) -> Nester2D {
        Nester2D::new(Options2D::new().with_algorithm(algorithm))
    }

    #[test]
    fn test_single_piece_at_origin() {
        let plan = Nester2D::new(Options2D::new().with_heuristic(Heuristic::Bssf).with_rotation(false))
            .solve(
                &[Piece2D::new("P", 600.0, 400.0)],
                &[Stock2D::new("S", 1200.0, 2400.0)],
            );

        assert!(plan.success);
        assert_eq!(plan.sheets.len(), 1);
        let p = &plan.sheets[0].placements[0];
        assert_eq!((p.x, p.y, p.rotated), (0.0, 0.0, false));
        assert_eq!(p.piece_id, "P#1");
    }

    #[test]
    fn test_empty_input() {
        let plan = nester(Algorithm2D::MaxRects).solve(&[], &[Stock2D::new("S", 10.0, 10.0)]);
        assert!(!plan.success);
        assert_eq!(plan.error.as_deref(), Some("No pieces or stock provided"));
    }

    #[test]
    fn test_invalid_stock_is_reported() {
        let plan = nester(Algorithm2D::MaxRects).solve(
            &[Piece2D::new("P", 10.0, 10.0)],
            &[Stock2D::new("S", 0.0, 10.0)],
        );
        assert!(!plan.success);
        assert!(plan.error.unwrap().contains("invalid size"));
    }

    #[test]
    fn test_oversized_piece_unplaced() {
        let plan = nester(Algorithm2D::MaxRects).solve(
            &[
                Piece2D::new("big", 3000.0, 100.0).with_rotation(false),
                Piece2D::new("ok", 100.0, 100.0),
            ],
            &[Stock2D::new("S", 1200.0, 2400.0).with_available(2)],
        );

        assert!(!plan.success);
        assert_eq!(plan.sheets.len(), 1);
        assert_eq!(plan.unplaced_pieces.len(), 1);
        assert_eq!(plan.unplaced_pieces[0].width, 3000.0);
        assert_eq!(plan.unplaced_count(), 1);
    }

    #[test]
    fn test_rotation_makes_piece_fit() {
        let stock = [Stock2D::new("S", 1200.0, 2400.0)];
        let piece = Piece2D::new("long", 2000.0, 500.0);

        let plan = nester(Algorithm2D::MaxRects).solve(&[piece.clone()], &stock);
        assert!(plan.success);
        assert!(plan.sheets[0].placements[0].rotated);

        let grained = piece.with_grain(GrainDirection::Horizontal);
        let plan = nester(Algorithm2D::MaxRects).solve(&[grained], &stock);
        assert!(!plan.success);
    }

    #[test]
    fn test_opens_new_sheet_when_full() {
        let plan = nester(Algorithm2D::Guillotine).solve(
            &[Piece2D::new("P", 100.0, 100.0).with_quantity(3)],
            &[Stock2D::new("S", 150.0, 150.0).with_available(5)],
        );

        assert!(plan.success);
        assert_eq!(plan.stock_used_count, 3);
        assert!((plan.statistics.total_used_area - 30_000.0).abs() < 1e-9);
        assert!((plan.statistics.total_stock_area - 67_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_smallest_stock_opened() {
        let plan = nester(Algorithm2D::MaxRects).solve(
            &[Piece2D::new("P", 400.0, 400.0)],
            &[
                Stock2D::new("large", 2000.0, 1000.0),
                Stock2D::new("small", 500.0, 500.0),
            ],
        );
        assert_eq!(plan.sheets[0].stock_id, "small");
    }

    #[test]
    fn test_statistics_and_cost() {
        let plan = nester(Algorithm2D::BottomLeftFill).solve(
            &[Piece2D::new("P", 50.0, 100.0).with_quantity(4)],
            &[Stock2D::new("S", 100.0, 100.0)
                .with_available(2)
                .with_unit_price(40.0)],
        );

        assert!(plan.success);
        assert_eq!(plan.stock_used_count, 2);
        assert!((plan.statistics.efficiency - 100.0).abs() < 1e-9);
        assert!((plan.statistics.total_cost - 80.0).abs() < 1e-9);
        assert!(plan.total_waste.abs() < 1e-9);
    }

    #[test]
    fn test_all_heuristics_deterministic() {
        let pieces = vec![
            Piece2D::new("A", 300.0, 200.0).with_quantity(5),
            Piece2D::new("B", 120.0, 450.0).with_quantity(4),
            Piece2D::new("C", 80.0, 80.0).with_quantity(9),
        ];
        let stock = vec![Stock2D::new("S", 1000.0, 800.0).with_available(10)];
        let nester = Nester2D::new(Options2D::new().with_all_heuristics(true).with_kerf(3.0));

        let first = nester.solve(&pieces, &stock);
        assert!(first.success);
        for _ in 0..5 {
            assert_eq!(nester.solve(&pieces, &stock), first);
        }
    }
}
