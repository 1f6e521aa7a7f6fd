//! 1D bar-cutting solver.

use crate::bar::ActiveBar;
use crate::types::{
    Algorithm1D, BarResult, CuttingPlan1D, CuttingRequest1D, Options1D, Piece1D, Statistics1D,
    Stock1D, UnplacedPiece1D,
};
use u_cutstock_core::{
    expand, percentage, sort_descending_by, Packer, Result, StockLedger, StockResource,
    UnplacedTracker, EPSILON,
};

use std::time::Instant;

/// 1D bar-cutting solver.
#[derive(Debug, Clone, Default)]
pub struct Packer1D {
    options: Options1D,
}

impl Packer1D {
    /// Creates a packer with the given options.
    pub fn new(options: Options1D) -> Self {
        Self { options }
    }

    /// Creates a packer with default options.
    pub fn default_config() -> Self {
        Self::new(Options1D::default())
    }

    /// Returns the options.
    pub fn options(&self) -> &Options1D {
        &self.options
    }

    /// Builds a cutting plan. Never panics on bad input; failures are
    /// reported through `success` and `error`.
    pub fn solve(&self, pieces: &[Piece1D], stock: &[Stock1D]) -> CuttingPlan1D {
        if pieces.is_empty() || stock.is_empty() {
            return CuttingPlan1D::failure("No pieces or stock provided");
        }

        match self.run(pieces, stock) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("1D run rejected: {}", e);
                CuttingPlan1D::failure(e.to_string())
            }
        }
    }

    fn run(&self, pieces: &[Piece1D], stock: &[Stock1D]) -> Result<CuttingPlan1D> {
        let start = Instant::now();
        self.options.validate()?;
        for s in stock {
            s.validate()?;
        }

        let mut units = expand(pieces)?;
        if units.is_empty() {
            return Ok(CuttingPlan1D::failure("No pieces or stock provided"));
        }
        sort_descending_by(&mut units, |p| p.size);

        let kerf = self.options.kerf;
        let algorithm = self.effective_algorithm();

        // Stock visited longest first when opening bars first-fit.
        let mut by_length: Vec<usize> = (0..stock.len()).collect();
        by_length.sort_by(|&a, &b| {
            stock[b]
                .length
                .partial_cmp(&stock[a].length)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut ledger = StockLedger::new(stock);
        let mut bars: Vec<ActiveBar> = Vec::new();
        let mut unplaced = UnplacedTracker::new();

        for piece in &units {
            let target = match algorithm {
                Algorithm1D::Ffd => first_fit(&bars, piece.size, kerf),
                _ => best_fit(&bars, piece.size, kerf),
            };

            if let Some(i) = target {
                bars[i].cut(piece, kerf);
                continue;
            }

            let opening = match algorithm {
                Algorithm1D::Ffd => first_fit_stock(stock, &by_length, &ledger, piece.size),
                _ => best_fit_stock(stock, &ledger, piece.size),
            };

            match opening {
                Some(s) if ledger.take(s) => {
                    let mut bar = ActiveBar::new(s, &stock[s]);
                    bar.cut(piece, kerf);
                    bars.push(bar);
                }
                _ => {
                    log::debug!("piece {} ({}) fits no bar", piece.id, piece.size);
                    unplaced.add(piece);
                }
            }
        }

        let plan = self.finish(bars, unplaced, units.len());
        log::info!(
            "{} cut {} pieces from {} bars in {}ms, efficiency {:.1}%",
            algorithm.as_str(),
            units.len(),
            plan.stock_used_count,
            start.elapsed().as_millis(),
            plan.statistics.efficiency
        );
        Ok(plan)
    }

    fn effective_algorithm(&self) -> Algorithm1D {
        match self.options.algorithm {
            Algorithm1D::BranchAndBound => {
                log::debug!("branch-and-bound is not available, running BFD");
                Algorithm1D::Bfd
            }
            other => other,
        }
    }

    fn finish(
        &self,
        bars: Vec<ActiveBar>,
        unplaced: UnplacedTracker<f64>,
        total_pieces: usize,
    ) -> CuttingPlan1D {
        let kerf = self.options.kerf;
        let min_usable = self.options.min_usable_waste;

        let total_cost: f64 = bars.iter().filter_map(|b| b.unit_price()).sum();
        let results: Vec<BarResult> = bars
            .into_iter()
            .map(|b| b.into_result(kerf, min_usable))
            .collect();

        let total_stock_length: f64 = results.iter().map(|b| b.stock_length).sum();
        let total_used_length: f64 = results.iter().map(|b| b.used_length()).sum();
        let total_waste: f64 = results.iter().map(|b| b.waste).sum();

        let unplaced_count = unplaced.total_quantity();
        let unplaced_pieces: Vec<UnplacedPiece1D> =
            unplaced.into_groups().into_iter().map(Into::into).collect();

        let success = unplaced_pieces.is_empty() && !results.is_empty();
        let error = (!unplaced_pieces.is_empty())
            .then(|| format!("{} piece(s) could not be placed", unplaced_count));

        CuttingPlan1D {
            success,
            error,
            stock_used_count: results.len(),
            total_waste,
            total_waste_percentage: percentage(total_waste, total_stock_length),
            bars: results,
            unplaced_pieces,
            statistics: Statistics1D {
                total_pieces,
                total_stock_length,
                total_used_length,
                efficiency: percentage(total_used_length, total_stock_length),
                total_cost,
            },
        }
    }
}

impl Packer for Packer1D {
    type Demand = Piece1D;
    type Stock = Stock1D;
    type Output = CuttingPlan1D;

    fn pack(&self, demand: &[Piece1D], stock: &[Stock1D]) -> CuttingPlan1D {
        self.solve(demand, stock)
    }

    fn name(&self) -> &'static str {
        self.options.algorithm.as_str()
    }
}

/// Runs a complete 1D request.
pub fn solve_request(request: &CuttingRequest1D) -> CuttingPlan1D {
    Packer1D::new(request.options.clone()).solve(&request.pieces, &request.stock)
}

/// Index of the first opened bar that fits the piece.
fn first_fit(bars: &[ActiveBar], length: f64, kerf: f64) -> Option<usize> {
    bars.iter().position(|b| b.fits(length, kerf))
}

/// Index of the opened bar with the smallest leftover after the cut.
fn best_fit(bars: &[ActiveBar], length: f64, kerf: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, bar) in bars.iter().enumerate() {
        if !bar.fits(length, kerf) {
            continue;
        }
        let leftover = bar.leftover_after(length, kerf);
        if best.map_or(true, |(_, b)| leftover < b - EPSILON) {
            best = Some((i, leftover));
        }
    }
    best.map(|(i, _)| i)
}

/// First available stock type, longest first, that holds the piece.
fn first_fit_stock(
    stock: &[Stock1D],
    by_length: &[usize],
    ledger: &StockLedger,
    length: f64,
) -> Option<usize> {
    by_length
        .iter()
        .copied()
        .find(|&i| ledger.is_available(i) && stock[i].size() + EPSILON >= length)
}

/// Available stock type minimizing `stock length - piece length`.
fn best_fit_stock(stock: &[Stock1D], ledger: &StockLedger, length: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in stock.iter().enumerate() {
        if !ledger.is_available(i) || s.length + EPSILON < length {
            continue;
        }
        let slack = s.length - length;
        if best.map_or(true, |(_, b)| slack < b - EPSILON) {
            best = Some((i, slack));
        }
    }
    best.map(|(i, _)| i)
}
