//! Multi-sheet selection.
//!
//! Every open sheet proposes its best candidate for a piece; the sheet whose
//! remaining area after the placement is the smallest fraction of its total
//! area wins. When no open sheet can take the piece, a new sheet is opened
//! from the smallest stock type that holds it.

use crate::heuristic::{Candidate, Orientation};
use crate::sheet::ActiveSheet;
use crate::types::{Options2D, Stock2D};
use u_cutstock_core::{StockLedger, EPSILON};

/// `(sheet_area - used_area - candidate_area) / sheet_area`.
pub fn waste_score(sheet_area: f64, used_area: f64, candidate_area: f64) -> f64 {
    if sheet_area <= 0.0 {
        return f64::INFINITY;
    }
    (sheet_area - used_area - candidate_area) / sheet_area
}

/// Sheet index and candidate with the lowest waste score; ties go to the
/// earlier sheet.
pub fn select_sheet(
    sheets: &[ActiveSheet],
    orientations: &[Orientation],
    options: &Options2D,
) -> Option<(usize, Candidate)> {
    let mut best: Option<(usize, Candidate, f64)> = None;

    for (index, sheet) in sheets.iter().enumerate() {
        let Some(candidate) = sheet.find(orientations, options) else {
            continue;
        };
        let score = waste_score(sheet.area(), sheet.used_area(), candidate.area());
        if best.map_or(true, |(_, _, b)| score < b - EPSILON) {
            best = Some((index, candidate, score));
        }
    }

    best.map(|(i, c, _)| (i, c))
}

/// Available stock type with the smallest area that holds the piece in an
/// allowed orientation; ties go to input order.
pub fn select_stock(
    stock: &[Stock2D],
    ledger: &StockLedger,
    orientations: &[Orientation],
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, s) in stock.iter().enumerate() {
        if !ledger.is_available(index) {
            continue;
        }
        let holds = orientations
            .iter()
            .any(|o| o.width <= s.width + EPSILON && o.height <= s.height + EPSILON);
        if !holds {
            continue;
        }
        if best.map_or(true, |(_, area)| s.area() < area - EPSILON) {
            best = Some((index, s.area()));
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Algorithm2D;
    use u_cutstock_core::UnitPiece;

    fn native(w: f64, h: f64) -> Orientation {
        Orientation {
            width: w,
            height: h,
            rotated: false,
        }
    }

    #[test]
    fn test_waste_score() {
        assert!((waste_score(100.0, 40.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(waste_score(0.0, 0.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_select_fuller_sheet() {
        let stock = Stock2D::new("S", 100.0, 100.0);
        let options = Options2D::new();
        let mut empty = ActiveSheet::new(0, &stock, Algorithm2D::MaxRects);
        let mut fuller = ActiveSheet::new(0, &stock, Algorithm2D::MaxRects);

        let o = [native(50.0, 100.0)];
        let piece = UnitPiece {
            id: "A#1".to_string(),
            line_id: "A".to_string(),
            origin_id: "A".to_string(),
            size: crate::types::Size2D::new(50.0, 100.0),
            can_rotate: false,
            grain: None,
            sequence: 0,
        };
        let c = fuller.find(&o, &options).unwrap();
        fuller.place(&piece, &c, 0.0);

        let sheets = vec![empty.clone(), fuller];
        let (index, candidate) = select_sheet(&sheets, &[native(20.0, 20.0)], &options).unwrap();
        assert_eq!(index, 1);
        assert_eq!(candidate.x, 50.0);

        // Equal scores keep the earlier sheet.
        let c = empty.find(&o, &options).unwrap();
        empty.place(&piece, &c, 0.0);
        let sheets = vec![empty.clone(), empty];
        assert_eq!(select_sheet(&sheets, &[native(20.0, 20.0)], &options).unwrap().0, 0);
    }

    #[test]
    fn test_select_sheet_none_fits() {
        let stock = Stock2D::new("S", 100.0, 100.0);
        let sheets = vec![ActiveSheet::new(0, &stock, Algorithm2D::MaxRects)];
        assert!(select_sheet(&sheets, &[native(120.0, 20.0)], &Options2D::new()).is_none());
    }

    #[test]
    fn test_select_stock_smallest_area() {
        let stock = vec![
            Stock2D::new("big", 3000.0, 1500.0),
            Stock2D::new("narrow", 200.0, 2500.0),
            Stock2D::new("small", 1000.0, 1000.0),
            Stock2D::new("small-dup", 1000.0, 1000.0),
        ];
        let ledger = StockLedger::new(&stock);

        assert_eq!(select_stock(&stock, &ledger, &[native(800.0, 600.0)]), Some(2));
        // Only the narrow sheet or the big one hold a 2200 long piece.
        assert_eq!(select_stock(&stock, &ledger, &[native(150.0, 2200.0)]), Some(1));
        assert_eq!(
            select_stock(&stock, &ledger, &[native(2200.0, 150.0)]),
            Some(0)
        );
        assert_eq!(
            select_stock(&stock, &ledger, &[native(2200.0, 150.0), native(150.0, 2200.0)]),
            Some(1)
        );
        assert_eq!(select_stock(&stock, &ledger, &[native(4000.0, 10.0)]), None);
    }

    #[test]
    fn test_select_stock_skips_exhausted() {
        let stock = vec![
            Stock2D::new("small", 1000.0, 1000.0),
            Stock2D::new("big", 2000.0, 2000.0),
        ];
        let mut ledger = StockLedger::new(&stock);
        assert!(ledger.take(0));

        assert_eq!(select_stock(&stock, &ledger, &[native(500.0, 500.0)]), Some(1));
    }
}
