//! # U-Cutstock 2D
//!
//! Rectangular sheet-nesting heuristics for the U-Cutstock engine.
//!
//! ## Features
//!
//! - Maximal-rectangles placement scored by BSSF, BAF, BLSF, BL, CP or a
//!   weighted blend, optionally evaluating every heuristic in parallel
//! - Guillotine splitting that keeps free space as disjoint rectangles
//! - Bottom-left fill from anchor points
//! - Kerf allowance, rotation and grain constraints
//! - Multi-sheet selection by remaining-area score
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutstock_d2::{Algorithm2D, Heuristic, Nester2D, Options2D, Piece2D, Stock2D};
//!
//! let pieces = vec![
//!     Piece2D::new("door", 600.0, 1800.0).with_quantity(2),
//!     Piece2D::new("shelf", 560.0, 300.0).with_quantity(6),
//! ];
//! let stock = vec![Stock2D::new("board", 1220.0, 2440.0).with_available(4)];
//!
//! let options = Options2D::new()
//!     .with_algorithm(Algorithm2D::MaxRects)
//!     .with_heuristic(Heuristic::Bssf)
//!     .with_kerf(3.0);
//!
//! let plan = Nester2D::new(options).solve(&pieces, &stock);
//! assert!(plan.success);
//! println!(
//!     "{} sheets, efficiency {:.1}%",
//!     plan.stock_used_count, plan.statistics.efficiency
//! );
//! ```

pub mod blf;
pub mod free_rect;
pub mod heuristic;
pub mod nester;
pub mod selector;
pub mod sheet;
pub mod types;

// Re-exports
pub use free_rect::{FreeRect, FreeRectangles, MAX_MERGE_PASSES, MIN_USEFUL_SIZE};
pub use heuristic::{Candidate, Orientation};
pub use nester::{solve_request, Nester2D};
pub use sheet::ActiveSheet;
pub use types::{
    Algorithm2D, CuttingPlan2D, CuttingRequest2D, Heuristic, Options2D, Piece2D, Placement2D,
    SheetResult, Size2D, Statistics2D, Stock2D, UnplacedPiece2D, UsableWaste2D,
};
pub use u_cutstock_core::{Error, GrainDirection, Packer, Result, UnitPiece};
