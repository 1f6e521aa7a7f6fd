//! # U-Cutstock Core
//!
//! Core traits and value types shared by the 1D bar-cutting and 2D sheet-nesting
//! engines of U-Cutstock.
//!
//! ## Core Components
//!
//! - **Demand traits**: [`Demand`], [`StockResource`] - what is requested and what it is cut from
//! - **Piece expansion**: [`expand`] - demand lines to unit pieces tagged with their origin
//! - **Stock accounting**: [`StockLedger`] - per-run availability of each stock type
//! - **Result helpers**: [`UnplacedTracker`], [`percentage`] - re-aggregation and ratios
//! - **Packer trait**: [`Packer`] - common interface for all cutting engines
//!
//! ## Example
//!
//! ```rust
//! use u_cutstock_core::{expand, Demand, Result};
//!
//! struct Line { id: String, length: f64, qty: usize }
//!
//! impl Demand for Line {
//!     type Size = f64;
//!     fn id(&self) -> &str { &self.id }
//!     fn origin_id(&self) -> &str { &self.id }
//!     fn quantity(&self) -> usize { self.qty }
//!     fn size(&self) -> f64 { self.length }
//!     fn validate(&self) -> Result<()> { Ok(()) }
//! }
//!
//! let pieces = expand(&[Line { id: "A".into(), length: 500.0, qty: 3 }]).unwrap();
//! assert_eq!(pieces.len(), 3);
//! assert_eq!(pieces[2].id, "A#3");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod expand;
pub mod piece;
pub mod result;
pub mod solver;
pub mod stock;

/// Tolerance used for floating-point comparisons of lengths and areas.
pub const EPSILON: f64 = 1e-6;

// Re-exports
pub use error::{Error, Result};
pub use expand::{expand, sort_descending_by};
pub use piece::{Demand, GrainDirection, PieceId, UnitPiece};
pub use result::{percentage, UnplacedGroup, UnplacedTracker};
pub use solver::Packer;
pub use stock::{StockLedger, StockResource};
