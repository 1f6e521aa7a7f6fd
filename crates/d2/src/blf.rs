//! Bottom-Left-Fill placement.
//!
//! Candidate anchors are the sheet origin plus the right edge, top edge and
//! diagonal corner of every placement, each offset by the kerf. A piece goes
//! to the lowest, then left-most, anchor where it stays inside the sheet and
//! keeps a kerf gap to every placement.

use crate::free_rect::FreeRect;
use crate::heuristic::{Candidate, Orientation};
use crate::types::{Placement2D, Size2D};
use u_cutstock_core::EPSILON;

/// Anchor points sorted by y, then x, without duplicates.
pub fn anchors(placements: &[Placement2D], kerf: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(1 + placements.len() * 3);
    points.push((0.0, 0.0));
    for p in placements {
        points.push((p.right() + kerf, p.y));
        points.push((p.x, p.top() + kerf));
        points.push((p.right() + kerf, p.top() + kerf));
    }

    points.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    });
    points.dedup_by(|a, b| (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON);
    points
}

/// Kerf-expanded box of a placement.
fn clearance(x: f64, y: f64, width: f64, height: f64, kerf: f64) -> FreeRect {
    FreeRect::new(x, y, width + kerf, height + kerf)
}

/// Returns true if a `width` x `height` box at (x, y) is inside the sheet and
/// keeps a kerf gap to every placement.
pub fn is_free(
    placements: &[Placement2D],
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    sheet: Size2D,
    kerf: f64,
) -> bool {
    if x + width > sheet.width + EPSILON || y + height > sheet.height + EPSILON {
        return false;
    }
    let candidate = clearance(x, y, width, height, kerf);
    placements
        .iter()
        .all(|p| !candidate.intersects(&clearance(p.x, p.y, p.width, p.height, kerf)))
}

/// Lowest, then left-most, feasible position over all orientations.
///
/// The candidate score is `y * 10000 + x`; on equal anchors the earlier
/// orientation wins.
pub fn find_position(
    placements: &[Placement2D],
    orientations: &[Orientation],
    sheet: Size2D,
    kerf: f64,
) -> Option<Candidate> {
    let points = anchors(placements, kerf);
    let mut best: Option<(usize, Candidate)> = None;

    for o in orientations {
        let hit = points
            .iter()
            .enumerate()
            .find(|(_, p)| is_free(placements, p.0, p.1, o.width, o.height, sheet, kerf));
        let Some((rank, &(x, y))) = hit else {
            continue;
        };
        if best.map_or(true, |(r, _)| rank < r) {
            best = Some((
                rank,
                Candidate {
                    rect_index: 0,
                    x,
                    y,
                    width: o.width,
                    height: o.height,
                    rotated: o.rotated,
                    score: y * 10_000.0 + x,
                },
            ));
        }
    }

    best.map(|(_, c)| c)
}

/// Full-width strip above the highest placement, if any space is left.
pub fn top_strip(placements: &[Placement2D], sheet: Size2D, kerf: f64) -> Option<FreeRect> {
    let top = placements.iter().map(|p| p.top()).fold(0.0_f64, f64::max);
    let y = if placements.is_empty() { 0.0 } else { top + kerf };
    let height = sheet.height - y;
    (height > EPSILON).then(|| FreeRect::new(0.0, y, sheet.width, height))
}
