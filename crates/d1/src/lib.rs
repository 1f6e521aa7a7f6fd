//! # U-Cutstock 1D
//!
//! Linear bar-cutting heuristics for the U-Cutstock engine.
//!
//! Pieces are sorted by length (longest first) and assigned to bars opened
//! from the available stock, leaving a kerf between adjacent cuts.
//!
//! ## Algorithms
//!
//! | Algorithm | Placement | New bar |
//! |-----------|-----------|---------|
//! | `Ffd` | first opened bar that fits | longest available stock that fits |
//! | `Bfd` | opened bar with the smallest leftover | stock minimizing `length - piece` |
//! | `BranchAndBound` | runs as `Bfd` | runs as `Bfd` |
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutstock_d1::{Algorithm1D, Options1D, Packer1D, Piece1D, Stock1D};
//!
//! let pieces = vec![Piece1D::new("P", 1000.0).with_quantity(2)];
//! let stock = vec![Stock1D::new("S", 2400.0).with_available(5)];
//!
//! let options = Options1D::new()
//!     .with_algorithm(Algorithm1D::Ffd)
//!     .with_kerf(3.0)
//!     .with_min_usable_waste(100.0);
//!
//! let plan = Packer1D::new(options).solve(&pieces, &stock);
//! assert!(plan.success);
//! assert_eq!(plan.bars.len(), 1);
//! assert!((plan.bars[0].waste - 397.0).abs() < 1e-9);
//! ```

pub mod bar;
pub mod packer;
pub mod types;

// Re-exports
pub use bar::ActiveBar;
pub use packer::{solve_request, Packer1D};
pub use types::{
    Algorithm1D, BarResult, Cut, CuttingPlan1D, CuttingRequest1D, Options1D, Piece1D,
    Statistics1D, Stock1D, UnplacedPiece1D, UsableWaste1D,
};
pub use u_cutstock_core::{Error, Packer, Result};
