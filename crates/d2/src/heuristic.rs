//! Placement scoring for the free-rectangle engines.

use crate::free_rect::{FreeRect, FreeRectangles};
use crate::types::{Heuristic, Options2D, Size2D};
use rayon::prelude::*;
use u_cutstock_core::{UnitPiece, EPSILON};

/// An allowed orientation of a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Orientations a piece may be placed in, native first.
///
/// The rotated orientation is offered only when the run allows rotation, the
/// piece permits it, its sides differ, and no enforced grain pins it.
pub fn orientations(piece: &UnitPiece<Size2D>, options: &Options2D) -> Vec<Orientation> {
    let size = piece.size;
    let mut result = vec![Orientation {
        width: size.width,
        height: size.height,
        rotated: false,
    }];

    let grain_locked = options.respect_grain && piece.has_grain();
    let square = (size.width - size.height).abs() < EPSILON;
    if options.allow_rotation && piece.can_rotate && !square && !grain_locked {
        result.push(Orientation {
            width: size.height,
            height: size.width,
            rotated: true,
        });
    }

    result
}

/// A scored position for a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index of the free rectangle the piece goes into. Unused by
    /// bottom-left fill.
    pub rect_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
    /// Lower is better.
    pub score: f64,
}

impl Candidate {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The placed box.
    pub fn rect(&self) -> FreeRect {
        FreeRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Length of the placed box's edges lying on the sheet boundary.
fn edge_contact(x: f64, y: f64, w: f64, h: f64, sheet: Size2D) -> f64 {
    let mut contact = 0.0;
    if x.abs() < EPSILON {
        contact += h;
    }
    if y.abs() < EPSILON {
        contact += w;
    }
    if (x + w - sheet.width).abs() < EPSILON {
        contact += h;
    }
    if (y + h - sheet.height).abs() < EPSILON {
        contact += w;
    }
    contact
}

/// Scores a `w` x `h` box at the bottom-left corner of `rect`.
pub fn score(heuristic: Heuristic, rect: &FreeRect, w: f64, h: f64, sheet: Size2D) -> f64 {
    let dw = rect.width - w;
    let dh = rect.height - h;
    match heuristic {
        Heuristic::Bssf => dw.min(dh),
        Heuristic::Baf => rect.area() - w * h,
        Heuristic::Blsf => dw.max(dh),
        Heuristic::Bl => rect.y * 10_000.0 + rect.x,
        Heuristic::Cp => -edge_contact(rect.x, rect.y, w, h, sheet),
        Heuristic::Best => {
            0.5 * dw.min(dh) + 0.3 * (rect.area() - w * h) + 0.0001 * (rect.y * 10_000.0 + rect.x)
        }
    }
}

/// Best (free rectangle, orientation) pair under one heuristic.
///
/// Pairs are visited by rectangle index, then orientation; the first of
/// equal scores wins.
pub fn find_best(
    free: &FreeRectangles,
    orientations: &[Orientation],
    heuristic: Heuristic,
    sheet: Size2D,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for (index, rect) in free.iter().enumerate() {
        for o in orientations {
            if !rect.fits(o.width, o.height) {
                continue;
            }
            let s = score(heuristic, rect, o.width, o.height, sheet);
            if best.map_or(true, |b| s < b.score) {
                best = Some(Candidate {
                    rect_index: index,
                    x: rect.x,
                    y: rect.y,
                    width: o.width,
                    height: o.height,
                    rotated: o.rotated,
                    score: s,
                });
            }
        }
    }

    best
}

/// Scores every base heuristic in parallel and keeps the globally lowest
/// score. Equal scores go to the earlier heuristic in [`Heuristic::BASE`].
pub fn find_best_any(
    free: &FreeRectangles,
    orientations: &[Orientation],
    sheet: Size2D,
) -> Option<Candidate> {
    let per_heuristic: Vec<Option<Candidate>> = Heuristic::BASE
        .par_iter()
        .map(|&h| find_best(free, orientations, h, sheet))
        .collect();

    per_heuristic
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Candidate>, c| match best {
            Some(b) if b.score <= c.score => Some(b),
            _ => Some(c),
        })
}

/// Best candidate for the configured heuristic or heuristic mode.
pub fn find_candidate(
    free: &FreeRectangles,
    orientations: &[Orientation],
    options: &Options2D,
    sheet: Size2D,
) -> Option<Candidate> {
    if options.all_heuristics {
        find_best_any(free, orientations, sheet)
    } else {
        find_best(free, orientations, options.heuristic, sheet)
    }
}
