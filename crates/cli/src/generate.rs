//! Seeded synthetic demand.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_cutstock::d1::{CuttingRequest1D, Options1D, Piece1D, Stock1D};
use u_cutstock::d2::{CuttingRequest2D, Options2D, Piece2D, Stock2D};

/// Random bar-cutting demand on 6 m and 3 m bars.
pub fn linear_demand(lines: usize, seed: u64) -> CuttingRequest1D {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut total = 0;
    let pieces = (0..lines)
        .map(|i| {
            let quantity = rng.gen_range(1..=6);
            total += quantity;
            Piece1D::new(format!("L{:03}", i + 1), rng.gen_range(150..=2800) as f64)
                .with_quantity(quantity)
        })
        .collect();

    CuttingRequest1D {
        pieces,
        stock: vec![
            Stock1D::new("BAR-6000", 6000.0)
                .with_available(total)
                .with_unit_price(24.0),
            Stock1D::new("BAR-3000", 3000.0)
                .with_available(total)
                .with_unit_price(13.0),
        ],
        options: Options1D::new().with_kerf(3.0).with_min_usable_waste(300.0),
    }
}

/// Random panel demand on full and half boards.
pub fn sheet_demand(lines: usize, seed: u64) -> CuttingRequest2D {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut total = 0;
    let pieces = (0..lines)
        .map(|i| {
            let quantity = rng.gen_range(1..=4);
            total += quantity;
            let width = rng.gen_range(80..=1200) as f64;
            let height = rng.gen_range(80..=2400) as f64;
            Piece2D::new(format!("P{:03}", i + 1), width, height)
                .with_quantity(quantity)
                .with_rotation(rng.gen_bool(0.8))
        })
        .collect();

    CuttingRequest2D {
        pieces,
        stock: vec![
            Stock2D::new("BOARD-2440", 1220.0, 2440.0)
                .with_available(total)
                .with_unit_price(48.0),
            Stock2D::new("BOARD-1220", 1220.0, 1220.0)
                .with_available(total)
                .with_unit_price(26.0),
        ],
        options: Options2D::new().with_kerf(4.0).with_min_usable_waste(40_000.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_demand() {
        assert_eq!(linear_demand(20, 7), linear_demand(20, 7));
        assert_eq!(sheet_demand(20, 7), sheet_demand(20, 7));
        assert_ne!(linear_demand(20, 7), linear_demand(20, 8));
    }

    #[test]
    fn test_generated_demand_is_solvable() {
        let request = linear_demand(30, 1);
        assert_eq!(request.pieces.len(), 30);
        let plan = u_cutstock::d1::solve_request(&request);
        assert!(plan.success, "{:?}", plan.error);

        let request = sheet_demand(12, 1);
        let plan = u_cutstock::d2::solve_request(&request);
        assert!(plan.success, "{:?}", plan.error);
    }
}
