//! Free-space bookkeeping for a sheet.
//!
//! Free rectangles live in a flat arena. Every mutating pass reads the current
//! rectangles by index, computes the replacement set and swaps it in, so a
//! rectangle is never split while another pass holds it.
//!
//! Two splitting schemes are supported:
//!
//! - **Maximal**: every free rectangle that intersects a placement is replaced
//!   by up to four fragments spanning the full opposite dimension. Fragments
//!   may overlap each other; [`FreeRectangles::merge`] and
//!   [`FreeRectangles::remove_redundant`] keep the set small.
//! - **Guillotine**: only the chosen rectangle is split, into two disjoint
//!   children, so the set stays a partition of the free space.

use u_cutstock_core::EPSILON;

/// Fragments with a side at or below this size are discarded.
pub const MIN_USEFUL_SIZE: f64 = 10.0;

/// Upper bound on merge passes.
pub const MAX_MERGE_PASSES: usize = 100;

/// An axis-aligned rectangle of free space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FreeRect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if a `width` x `height` box fits inside.
    pub fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.width + EPSILON && height <= self.height + EPSILON
    }

    /// Returns true if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &FreeRect) -> bool {
        other.x + EPSILON >= self.x
            && other.y + EPSILON >= self.y
            && other.right() <= self.right() + EPSILON
            && other.top() <= self.top() + EPSILON
    }

    /// Returns true if the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &FreeRect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.top() - EPSILON
            && other.y < self.top() - EPSILON
    }

    /// Returns true if neither side is a sliver.
    pub fn is_useful(&self) -> bool {
        self.width > MIN_USEFUL_SIZE && self.height > MIN_USEFUL_SIZE
    }

    /// Returns the union if the two rectangles share a full edge.
    fn union_if_adjacent(&self, other: &FreeRect) -> Option<FreeRect> {
        let same_row = (self.y - other.y).abs() < EPSILON
            && (self.height - other.height).abs() < EPSILON;
        if same_row {
            if (self.right() - other.x).abs() < EPSILON {
                return Some(FreeRect::new(self.x, self.y, self.width + other.width, self.height));
            }
            if (other.right() - self.x).abs() < EPSILON {
                return Some(FreeRect::new(other.x, self.y, self.width + other.width, self.height));
            }
        }

        let same_column = (self.x - other.x).abs() < EPSILON
            && (self.width - other.width).abs() < EPSILON;
        if same_column {
            if (self.top() - other.y).abs() < EPSILON {
                return Some(FreeRect::new(self.x, self.y, self.width, self.height + other.height));
            }
            if (other.top() - self.y).abs() < EPSILON {
                return Some(FreeRect::new(self.x, other.y, self.width, self.height + other.height));
            }
        }

        None
    }
}

/// Set of free rectangles of one sheet.
#[derive(Debug, Clone, Default)]
pub struct FreeRectangles {
    rects: Vec<FreeRect>,
}

impl FreeRectangles {
    /// Creates the free space of an empty `width` x `height` sheet.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            rects: vec![FreeRect::new(0.0, 0.0, width, height)],
        }
    }

    /// Creates a set from existing rectangles.
    pub fn from_rects(rects: Vec<FreeRect>) -> Self {
        Self { rects }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FreeRect> {
        self.rects.get(index)
    }

    pub fn as_slice(&self) -> &[FreeRect] {
        &self.rects
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreeRect> {
        self.rects.iter()
    }

    /// Returns the rectangle with the largest area (earliest on ties).
    pub fn largest(&self) -> Option<FreeRect> {
        self.rects
            .iter()
            .copied()
            .fold(None, |best: Option<FreeRect>, r| match best {
                Some(b) if b.area() + EPSILON >= r.area() => Some(b),
                _ => Some(r),
            })
    }

    /// Fragments of `rect` left free around a placed box expanded by `kerf`
    /// on its right and top sides.
    ///
    /// Each fragment spans the full opposite dimension of `rect`. Slivers are
    /// dropped. Returns `[rect]` unchanged when the box does not intersect it.
    pub fn split_maximal(rect: &FreeRect, placed: &FreeRect, kerf: f64) -> Vec<FreeRect> {
        let cut = FreeRect::new(placed.x, placed.y, placed.width + kerf, placed.height + kerf);
        if !rect.intersects(&cut) {
            return vec![*rect];
        }

        let mut fragments = Vec::with_capacity(4);
        if cut.x > rect.x + EPSILON {
            fragments.push(FreeRect::new(rect.x, rect.y, cut.x - rect.x, rect.height));
        }
        if cut.right() < rect.right() - EPSILON {
            fragments.push(FreeRect::new(
                cut.right(),
                rect.y,
                rect.right() - cut.right(),
                rect.height,
            ));
        }
        if cut.y > rect.y + EPSILON {
            fragments.push(FreeRect::new(rect.x, rect.y, rect.width, cut.y - rect.y));
        }
        if cut.top() < rect.top() - EPSILON {
            fragments.push(FreeRect::new(
                rect.x,
                cut.top(),
                rect.width,
                rect.top() - cut.top(),
            ));
        }

        fragments.retain(FreeRect::is_useful);
        fragments
    }

    /// Splits `rect` after placing a `width` x `height` box at its
    /// bottom-left corner into two disjoint children.
    ///
    /// With `horizontal` the cut runs along the top of the box, so the right
    /// child is only as tall as the box. Otherwise the cut runs along its
    /// right side and the top child is only as wide as the box.
    pub fn split_guillotine(
        rect: &FreeRect,
        width: f64,
        height: f64,
        kerf: f64,
        horizontal: bool,
    ) -> Vec<FreeRect> {
        let right_width = rect.width - width - kerf;
        let top_height = rect.height - height - kerf;

        let (right, top) = if horizontal {
            (
                FreeRect::new(rect.x + width + kerf, rect.y, right_width, height),
                FreeRect::new(rect.x, rect.y + height + kerf, rect.width, top_height),
            )
        } else {
            (
                FreeRect::new(rect.x + width + kerf, rect.y, right_width, rect.height),
                FreeRect::new(rect.x, rect.y + height + kerf, width, top_height),
            )
        };

        [right, top].into_iter().filter(FreeRect::is_useful).collect()
    }

    /// Shorter-leftover-axis rule: cut horizontally when less width than
    /// height is left over.
    pub fn prefers_horizontal(rect: &FreeRect, width: f64, height: f64) -> bool {
        rect.width - width < rect.height - height
    }

    /// Carves a placed box out of every intersecting rectangle, then merges
    /// and prunes the set.
    pub fn place_maximal(&mut self, placed: &FreeRect, kerf: f64) {
        let rects = std::mem::take(&mut self.rects);
        self.rects = rects
            .iter()
            .flat_map(|r| Self::split_maximal(r, placed, kerf))
            .collect();
        self.merge();
        self.remove_redundant();
    }

    /// Replaces the rectangle at `index` by its guillotine children.
    ///
    /// The box sits at the rectangle's bottom-left corner. Returns false if
    /// `index` is out of range.
    pub fn place_guillotine(&mut self, index: usize, width: f64, height: f64, kerf: f64) -> bool {
        let Some(rect) = self.rects.get(index).copied() else {
            return false;
        };
        let horizontal = Self::prefers_horizontal(&rect, width, height);
        let children = Self::split_guillotine(&rect, width, height, kerf, horizontal);

        let mut rebuilt = Vec::with_capacity(self.rects.len() + 1);
        rebuilt.extend_from_slice(&self.rects[..index]);
        rebuilt.extend(children);
        rebuilt.extend_from_slice(&self.rects[index + 1..]);
        self.rects = rebuilt;
        true
    }

    /// Joins rectangles that share a full edge.
    ///
    /// Repeats pairwise scans until a pass makes no merge or
    /// [`MAX_MERGE_PASSES`] passes ran. Returns the number of merges.
    pub fn merge(&mut self) -> usize {
        let mut merges = 0;

        for _ in 0..MAX_MERGE_PASSES {
            let mut merged_any = false;
            let mut consumed = vec![false; self.rects.len()];
            let mut rebuilt = Vec::with_capacity(self.rects.len());

            for i in 0..self.rects.len() {
                if consumed[i] {
                    continue;
                }
                let mut current = self.rects[i];
                for j in (i + 1)..self.rects.len() {
                    if consumed[j] {
                        continue;
                    }
                    if let Some(union) = current.union_if_adjacent(&self.rects[j]) {
                        current = union;
                        consumed[j] = true;
                        merged_any = true;
                        merges += 1;
                    }
                }
                rebuilt.push(current);
            }

            self.rects = rebuilt;
            if !merged_any {
                break;
            }
        }

        merges
    }

    /// Drops every rectangle contained in another one.
    ///
    /// Of two identical rectangles the earlier one is kept.
    pub fn remove_redundant(&mut self) -> usize {
        let n = self.rects.len();
        let mut redundant = vec![false; n];

        for i in 0..n {
            for j in 0..n {
                if i == j || redundant[j] || !self.rects[j].contains(&self.rects[i]) {
                    continue;
                }
                let identical = self.rects[i].contains(&self.rects[j]);
                if !identical || j < i {
                    redundant[i] = true;
                    break;
                }
            }
        }

        let before = self.rects.len();
        let mut index = 0;
        self.rects.retain(|_| {
            let keep = !redundant[index];
            index += 1;
            keep
        });
        before - self.rects.len()
    }
}
