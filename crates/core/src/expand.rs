//! Piece expansion: demand lines to unit pieces.

use crate::piece::{Demand, UnitPiece};
use crate::Result;
use std::cmp::Ordering;

/// Expands demand lines into a flat sequence of unit pieces.
///
/// Each line yields `quantity` units that carry the line's origin identity.
/// Units are numbered from 1 within their line and receive a global sequence
/// number in expansion order. Lines with zero quantity yield nothing.
///
/// # Errors
///
/// Returns the first validation error reported by a line.
pub fn expand<D: Demand>(lines: &[D]) -> Result<Vec<UnitPiece<D::Size>>> {
    let total: usize = lines.iter().map(|l| l.quantity()).sum();
    let mut pieces = Vec::with_capacity(total);

    for line in lines {
        line.validate()?;

        for n in 1..=line.quantity() {
            pieces.push(UnitPiece {
                id: format!("{}#{}", line.id(), n),
                line_id: line.id().to_string(),
                origin_id: line.origin_id().to_string(),
                size: line.size(),
                can_rotate: line.can_rotate(),
                grain: line.grain(),
                sequence: pieces.len(),
            });
        }
    }

    log::debug!("expanded {} demand lines into {} pieces", lines.len(), total);
    Ok(pieces)
}

/// Sorts pieces in place by a key, largest first.
///
/// The sort is stable, so equal keys keep their expansion order.
pub fn sort_descending_by<S, F>(pieces: &mut [UnitPiece<S>], key: F)
where
    F: Fn(&UnitPiece<S>) -> f64,
{
    pieces.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::GrainDirection;
    use crate::Error;

    struct Line {
        id: &'static str,
        origin: &'static str,
        length: f64,
        qty: usize,
    }

    impl Demand for Line {
        type Size = f64;

        fn id(&self) -> &str {
            self.id
        }

        fn origin_id(&self) -> &str {
            self.origin
        }

        fn quantity(&self) -> usize {
            self.qty
        }

        fn size(&self) -> f64 {
            self.length
        }

        fn grain(&self) -> Option<GrainDirection> {
            if self.id == "G" {
                Some(GrainDirection::Vertical)
            } else {
                None
            }
        }

        fn validate(&self) -> crate::Result<()> {
            if self.length <= 0.0 {
                return Err(Error::InvalidPiece(format!("{}: length must be positive", self.id)));
            }
            Ok(())
        }
    }

    #[test]
    fn test_expand_quantities() {
        let lines = [
            Line { id: "A", origin: "order-1", length: 100.0, qty: 2 },
            Line { id: "B", origin: "order-2", length: 50.0, qty: 3 },
        ];

        let pieces = expand(&lines).unwrap();

        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[0].id, "A#1");
        assert_eq!(pieces[1].id, "A#2");
        assert_eq!(pieces[2].id, "B#1");
        assert_eq!(pieces[4].origin_id, "order-2");
        assert_eq!(pieces[4].line_id, "B");
        let sequences: Vec<usize> = pieces.iter().map(|p| p.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_expand_zero_quantity() {
        let lines = [Line { id: "A", origin: "A", length: 100.0, qty: 0 }];
        assert!(expand(&lines).unwrap().is_empty());
    }

    #[test]
    fn test_expand_carries_grain() {
        let lines = [Line { id: "G", origin: "G", length: 10.0, qty: 1 }];
        let pieces = expand(&lines).unwrap();
        assert!(pieces[0].has_grain());
    }

    #[test]
    fn test_expand_rejects_invalid_line() {
        let lines = [
            Line { id: "A", origin: "A", length: 100.0, qty: 1 },
            Line { id: "bad", origin: "bad", length: -1.0, qty: 1 },
        ];
        assert!(matches!(expand(&lines), Err(Error::InvalidPiece(_))));
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let lines = [
            Line { id: "S", origin: "S", length: 10.0, qty: 2 },
            Line { id: "L", origin: "L", length: 30.0, qty: 1 },
            Line { id: "T", origin: "T", length: 10.0, qty: 1 },
        ];
        let mut pieces = expand(&lines).unwrap();
        sort_descending_by(&mut pieces, |p| p.size);

        let ids: Vec<&str> = pieces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["L#1", "S#1", "S#2", "T#1"]);
    }
}
